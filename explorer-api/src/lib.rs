//! # Explorer API Server
//!
//! REST API over the cache orchestrator. Every route is a `GET`.
//!
//! ## Endpoints
//!
//! - `GET /location?data=<search>` - Geocode a search (object or `null`)
//! - `GET /weather` - Daily forecast for a location
//! - `GET /events` - Upcoming events near a location
//! - `GET /movies` - Movies matching the location's city
//! - `GET /yelp` - Restaurants near a location
//! - `GET /trails` - Hiking trails near a location
//! - `GET /health` - Liveness
//! - `GET /stats` - Cache counters
//!
//! The dependent routes take the location as flat query parameters:
//! `id`, `search_query`, `formatted_query`, `latitude`, `longitude`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use explorer_api::{ApiServer, ApiConfig};
//!
//! let server = ApiServer::open(ApiConfig::from_env()?).await?;
//! server.run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig, DEFAULT_PORT};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use explorer_core::error::Result;

/// API server for Explorer.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Wraps prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Opens the store and provider client described by `config`.
    pub async fn open(config: ApiConfig) -> Result<Self> {
        Ok(Self::new(AppState::open(config).await?))
    }

    /// Shared state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl-C, then closes the store.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Explorer API server listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Shutting down");
        if let Err(e) = self.state.orchestrator.close().await {
            warn!(error = %e, "Store did not close cleanly");
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

/// Starts the API server from the environment on `0.0.0.0:<port>`.
pub async fn start_server(port: u16) -> std::io::Result<()> {
    let mut config = ApiConfig::from_env().map_err(std::io::Error::other)?;
    config.port = port;
    let server = ApiServer::open(config).await.map_err(std::io::Error::other)?;
    server.run(([0, 0, 0, 0], port)).await
}
