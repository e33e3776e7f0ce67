//! HTTP boundary: routes, middleware and the serve loop.
mod cors;
mod error_mapping;
pub mod handlers;
mod request_logging;
mod structured_error;

pub use cors::build_cors_layer;
pub use error_mapping::ToStructuredError;
pub use handlers::SharedDirectory;
pub use request_logging::{RequestLoggingLayer, RequestLoggingService};
pub use structured_error::{ApiError, StructuredError};

use crate::config::ServerSettings;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use http::StatusCode;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// Build the application router over a shared directory.
pub fn build_router(directory: SharedDirectory, settings: &ServerSettings) -> Router {
    let mut router = Router::new()
        .route(
            "/api/persons",
            get(handlers::list_persons).post(handlers::create_person),
        )
        .route(
            "/api/persons/{id}",
            get(handlers::get_person)
                .put(handlers::update_person)
                .delete(handlers::delete_person),
        )
        .route("/api/info", get(handlers::info_json))
        .route("/info", get(handlers::info_page))
        .with_state(directory);

    if let Some(static_dir) = &settings.static_dir {
        info!("Serving static files from {}", static_dir.display());
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(settings.request_timeout_secs),
        ))
        .layer(build_cors_layer(settings.cors_origins.clone()))
        .layer(RequestLoggingLayer)
}

/// Bind `settings.addr` and serve until Ctrl-C.
pub async fn serve(directory: SharedDirectory, settings: &ServerSettings) -> std::io::Result<()> {
    let listener = TcpListener::bind(&settings.addr).await?;
    let local_addr = listener.local_addr()?;
    info!("Phonebook daemon listening on http://{local_addr}");

    let router = build_router(directory, settings);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Phonebook daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
