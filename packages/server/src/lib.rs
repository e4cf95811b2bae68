//! Chat gateway library.
//!
//! Relays chat traffic arriving over HTTP and WebSocket to an agent backend
//! (a remote HTTP service or a local subprocess bridge) and masks backend
//! outages with canned fallback text.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
