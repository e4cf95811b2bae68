//! Chat gateway HTTP / WebSocket surface.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::error::ApiError;
pub use server::{Server, build_router};
pub use signal::shutdown_signal;
pub use state::AppState;
