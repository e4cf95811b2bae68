//! Gateway configuration.
//!
//! The binary fills this in from command-line flags and the environment;
//! tests construct it directly.

use std::{path::PathBuf, time::Duration};

use crate::domain::BackendKind;

/// Default backend timeout (30 s)
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Where requests are forwarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Remote agent service reached with JSON POSTs to `<base_url>/api/<op>`
    Http { base_url: String },
    /// Bridge process spawned per call as `<program> <script> <command> <args...>`
    Process { program: String, script: PathBuf },
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Http { .. } => BackendKind::Http,
            BackendConfig::Process { .. } => BackendKind::Process,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
    pub timeout: Duration,
    /// Serve the pre-built front-end bundle for unmatched GET routes
    pub production: bool,
    pub static_dir: PathBuf,
}

impl GatewayConfig {
    /// Asset directory to serve, if any
    pub fn static_assets(&self) -> Option<PathBuf> {
        self.production.then(|| self.static_dir.clone())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            backend: BackendConfig::Http {
                base_url: "http://localhost:8000".to_string(),
            },
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            production: false,
            static_dir: PathBuf::from("client/build"),
        }
    }
}
