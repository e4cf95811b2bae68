//! Server execution logic.

use std::{any::Any, future::Future, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{
    handler::{
        error::ApiError,
        http::{analyze, chat, clear, health_check, help, tools},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the gateway router
///
/// When `static_dir` is given, unknown paths are served from it and fall
/// back to its `index.html` so client-side routes resolve.
pub fn build_router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/chat", post(chat))
        .route("/api/clear", post(clear))
        .route("/api/help", get(help).post(help))
        .route("/api/analyze", post(analyze))
        .route("/api/tools", get(tools))
        .route("/api/health", get(health_check));

    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router,
    };

    router
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("Internal server error: {}", detail)).into_response()
}

fn websocket_url(addr: SocketAddr) -> String {
    format!("ws://{}/ws", addr)
}

/// Chat gateway server
///
/// # Example
///
/// ```ignore
/// let state = AppState::with_backend(backend);
/// let server = Server::new(state, None);
/// server.run("0.0.0.0".to_string(), 5000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Built web client, served in production mode
    static_dir: Option<PathBuf>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `state` - Use cases wired around the backend and session registry
    /// * `static_dir` - Directory of static client assets, if any
    pub fn new(state: AppState, static_dir: Option<PathBuf>) -> Self {
        Self {
            state: Arc::new(state),
            static_dir,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.static_dir.clone())
    }

    /// Run the chat gateway
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 5000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        let local_addr = listener.local_addr()?;
        tracing::info!("Chat gateway listening on {}", local_addr);
        tracing::info!("Connect to: {}", websocket_url(local_addr));
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
