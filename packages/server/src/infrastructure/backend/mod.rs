//! Backend adapters
//!
//! - `http`: remote agent service over HTTP (reqwest)
//! - `process`: bridge process spawned per call (tokio::process)

pub mod http;
pub mod process;

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{config::BackendConfig, domain::Backend};

pub use http::HttpBackend;
pub use process::ProcessBackend;

/// Errors raised while constructing a backend from configuration
#[derive(Debug, Error)]
pub enum BackendBuildError {
    #[error("invalid backend url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Build the backend selected by configuration
pub fn build_backend(
    config: &BackendConfig,
    timeout: Duration,
) -> Result<Arc<dyn Backend>, BackendBuildError> {
    match config {
        BackendConfig::Http { base_url } => {
            tracing::info!("Using HTTP backend at {}", base_url);
            Ok(Arc::new(HttpBackend::new(base_url, timeout)?))
        }
        BackendConfig::Process { program, script } => {
            tracing::info!(
                "Using process backend: {} {}",
                program,
                script.display()
            );
            Ok(Arc::new(ProcessBackend::bridge(
                program.clone(),
                script.clone(),
                timeout,
            )))
        }
    }
}
