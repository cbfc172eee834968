//! HTTP dashboard surface for ecldash.
//!
//! Thin request-handling glue over the pipeline: a landing page, a segment
//! listing, and a dashboard endpoint returning bar-chart figure payloads as
//! JSON for client-side rendering. Selections (segment, dates, firms)
//! arrive as query parameters and live only for the request; every request
//! re-reads the workbooks.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use ecldash::data::AppConfig;

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum WebError {
    /// IO error (bind or accept failure)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared, immutable application state: the segment configuration only.
/// No table survives a request.
#[derive(Debug)]
pub struct AppState {
    /// Segment configuration loaded at startup.
    pub config: AppConfig,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::landing))
        .route("/api/segments", get(routes::segments))
        .route("/api/dashboard", get(routes::dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard until the process is stopped.
pub async fn serve(addr: SocketAddr, config: AppConfig) -> Result<(), WebError> {
    let state = Arc::new(AppState { config });
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ecldash listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
