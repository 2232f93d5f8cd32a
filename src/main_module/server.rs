//! HTTP server initialization and routing

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{health_check, health_check_simple, shutdown_signal};
use crate::core::config::StorageConfig;
use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;
use crate::gallery;

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/health", get(health_check_simple))
        .route(ApiUrls::HEALTH, get(health_check))
        .merge(gallery::configure());

    let mut app = api_router.with_state(app_state.clone());

    // S3 photos are served by the bucket itself.
    if let StorageConfig::Local(local) = &app_state.config.storage {
        app = app.nest_service(ApiUrls::STORAGE, ServeDir::new(&local.root));
    }

    app.layer(DefaultBodyLimit::max(app_state.config.server.max_upload_bytes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!("http", method = %req.method(), uri = %req.uri())
            }),
        )
}

pub async fn run_axum_server(app_state: Arc<AppState>) -> std::io::Result<()> {
    let addr = app_state.config.bind_address();
    let app = build_router(app_state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Failed to bind to {}: {} - is another instance running?",
                addr, e
            );
            return Err(e);
        }
    };
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(std::io::Error::other)
}
