//! Chat gateway relaying browser chat traffic to an agent backend.
//!
//! Settings come from command-line flags, the environment, and a `.env` file
//! in the working directory, in that order of precedence.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hashi-server
//! cargo run --bin hashi-server -- --port 3000 --backend process
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{ArgAction, Parser, ValueEnum, builder::BoolishValueParser};
use hashi_server::{
    config::{BackendConfig, DEFAULT_TIMEOUT_MS, GatewayConfig},
    infrastructure::{
        backend::build_backend, message_pusher::WebSocketMessagePusher,
        repository::InMemorySessionRepository,
    },
    ui::{AppState, Server},
};
use hashi_shared::logger::setup_logger;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendKindArg {
    Http,
    Process,
}

#[derive(Parser, Debug)]
#[command(name = "hashi-server")]
#[command(about = "Chat gateway relaying HTTP and WebSocket chat to an agent backend", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Backend transport
    #[arg(long = "backend", env = "BACKEND_KIND", value_enum, default_value = "http")]
    backend_kind: BackendKindArg,

    /// Base URL of the HTTP agent service
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// Interpreter used to run the bridge script
    #[arg(long, env = "BRIDGE_PROGRAM", default_value = "python3")]
    bridge_program: String,

    /// Bridge script path
    #[arg(long, env = "BRIDGE_SCRIPT", default_value = "python_bridge.py")]
    bridge_script: PathBuf,

    /// Backend timeout in milliseconds
    #[arg(long = "timeout-ms", env = "BACKEND_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    backend_timeout_ms: u64,

    /// Serve the built web client from --static-dir (accepts true/false, 1/0, yes/no, on/off)
    #[arg(
        long,
        env = "PRODUCTION",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    production: bool,

    /// Directory of the built web client
    #[arg(long, env = "STATIC_DIR", default_value = "client/build")]
    static_dir: PathBuf,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        let backend = match args.backend_kind {
            BackendKindArg::Http => BackendConfig::Http {
                base_url: args.backend_url,
            },
            BackendKindArg::Process => BackendConfig::Process {
                program: args.bridge_program,
                script: args.bridge_script,
            },
        };
        GatewayConfig {
            host: args.host,
            port: args.port,
            backend,
            timeout: Duration::from_millis(args.backend_timeout_ms),
            production: args.production,
            static_dir: args.static_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    // .env is optional; flags and real environment variables take precedence
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = GatewayConfig::from(args);

    // Initialize dependencies in order:
    // 1. Backend
    // 2. Repository
    // 3. MessagePusher
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Backend (HTTP service or bridge process)
    let backend = match build_backend(&config.backend, config.timeout) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!("Backend configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Backend timeout set to {}ms",
        config.timeout.as_millis()
    );

    // 2. Create Repository (in-memory session registry)
    let repository = Arc::new(InMemorySessionRepository::new());

    // 3. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 4. Wire UseCases into the shared state
    let state = AppState::new(backend, repository, message_pusher);

    // 5. Create and run the server
    let static_dir = config.static_assets();
    if let Some(dir) = &static_dir {
        tracing::info!("Serving static client from {}", dir.display());
    }
    let server = Server::new(state, static_dir);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
