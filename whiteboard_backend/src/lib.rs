//! Relay server for the collaborative whiteboard.
//!
//! Every frame a client sends on `/ws` is forwarded, unchanged, to every
//! other open connection. Nothing is stored.

use chrono::{DateTime, Utc};
use relay::Relay;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod relay;
pub mod server;
mod websocket;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::{router, serve, serve_listener};

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            relay: Arc::new(Relay::new()),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
