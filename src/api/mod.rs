//! API module for StreamVerse
//!
//! Exposes the playlist, player view, search and AI helpers as a local JSON
//! HTTP API.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{build_router, AppState};

/// API Server for handling REST requests
pub struct ApiServer {
    state: AppState,
    host: String,
    port: u16,
}

impl ApiServer {
    /// Create a new API server from configuration
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        let host = config.server.host.clone();
        let port = config.server.port;
        let state = AppState::from_config(config).await?;
        Ok(Self { state, host, port })
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on {}:{}", self.host, self.port);
        server::start_http_server(self.state, &self.host, self.port).await
    }
}
