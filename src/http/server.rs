//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all catalog routes
//! - Wire up the request instrumentation middleware
//! - Share the telemetry context and store through application state
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::CatalogConfig;
use crate::http::handlers;
use crate::http::middleware::instrument_request;
use crate::observability::Telemetry;
use crate::store::CatalogStore;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<Telemetry>,
    pub store: Arc<CatalogStore>,
    /// Form fields that must be present and non-empty on add.
    pub required_fields: Arc<Vec<String>>,
}

/// HTTP server for the course catalog.
pub struct HttpServer {
    router: Router,
    config: CatalogConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given telemetry context and store.
    pub fn new(config: CatalogConfig, telemetry: Arc<Telemetry>, store: Arc<CatalogStore>) -> Self {
        let state = AppState {
            telemetry,
            store,
            required_fields: Arc::new(config.validation.required_fields.clone()),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router. The instrumentation middleware is layered over
    /// every route so each completed request records exactly one root span,
    /// one counter increment, and one histogram sample.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/catalog", get(handlers::course_catalog))
            .route(
                "/add_course",
                get(handlers::add_course_form).post(handlers::add_course),
            )
            .route("/course/{code}", get(handlers::course_details))
            .route("/health", get(handlers::health))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                instrument_request,
            ))
            .with_state(state)
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            store = %self.config.store.path.display(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
    } else {
        tracing::info!("Shutdown signal received");
    }
}
