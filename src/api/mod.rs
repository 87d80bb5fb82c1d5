//! HTTP API
//!
//! Read-only routes over the catalog. Everything below `/v1/` goes through a
//! single wildcard route and is dispatched by [`routes::parse`], so static
//! segments like `servers/types` and parameters like `{region}` never compete
//! inside the router.

pub mod handlers;
pub mod routes;

use crate::catalog::Catalog;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use handlers::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::{handle, Reply};
pub use routes::Endpoint;

/// Build the application router. Responses are compressed when the client
/// sends a matching `Accept-Encoding`.
pub fn router(catalog: Arc<Catalog>) -> Router {
    let state = AppState { catalog };

    Router::new()
        .route("/", get(handlers::root))
        .route("/package-version", get(handlers::package_version))
        .route("/v1/{*path}", get(handlers::v1))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any)),
        )
}

/// Serve the router until the process is stopped
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")
}
