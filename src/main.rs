//! Course catalog web service.
//!
//! A minimal web catalog of courses built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │              COURSE CATALOG                 │
//!                      │                                             │
//!   Client Request     │  ┌─────────┐   ┌────────────┐   ┌────────┐ │
//!   ───────────────────┼─▶│  http   │──▶│ middleware │──▶│handlers│ │
//!                      │  │ server  │   │ root span  │   │ child  │ │
//!                      │  └─────────┘   │ + timing   │   │ spans  │ │
//!                      │                └────────────┘   └───┬────┘ │
//!                      │                                     ▼      │
//!   Client Response    │  ┌─────────┐                  ┌─────────┐  │
//!   ◀──────────────────┼──│  views  │◀─────────────────│  store  │  │
//!                      │  │  html   │                  │  json   │  │
//!                      │  └─────────┘                  └─────────┘  │
//!                      │                                             │
//!                      │  ┌───────────────────────────────────────┐ │
//!                      │  │         Cross-Cutting Concerns         │ │
//!                      │  │  ┌────────┐ ┌─────────────┐ ┌───────┐ │ │
//!                      │  │  │ config │ │ telemetry   │ │metrics│ │ │
//!                      │  │  │        │ │ OTLP export │ │  prom │ │ │
//!                      │  │  └────────┘ └─────────────┘ └───────┘ │ │
//!                      │  └───────────────────────────────────────┘ │
//!                      └────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_catalog::config::{self, CatalogConfig, TelemetryConfig};
use course_catalog::observability::Telemetry;
use course_catalog::store::CatalogStore;
use course_catalog::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "course-catalog", about = "Course catalog web service")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => CatalogConfig::default(),
    };

    let _log_guard = init_logging(&config.telemetry);

    tracing::info!("course-catalog v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = %config.store.path.display(),
        service_name = %config.telemetry.service_name,
        "Configuration loaded"
    );

    let telemetry = Arc::new(Telemetry::init(&config.telemetry)?);
    let store = Arc::new(CatalogStore::new(&config.store.path));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let server = HttpServer::new(config, telemetry.clone(), store);
    server.run(listener).await?;

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber: env-filtered stdout output plus an
/// optional non-blocking log file. The returned guard must live until exit
/// so buffered file output is flushed.
fn init_logging(config: &TelemetryConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "course_catalog=info".into());

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("app.log"));
            let (writer, guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::never(dir, name),
            );
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}
