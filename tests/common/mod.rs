//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
use tempfile::TempDir;

use course_catalog::config::CatalogConfig;
use course_catalog::observability::Telemetry;
use course_catalog::store::CatalogStore;
use course_catalog::HttpServer;

/// A catalog server bound to an ephemeral port, with its spans captured by
/// an in-memory exporter and its store in a temp directory.
pub struct TestServer {
    pub addr: SocketAddr,
    #[allow(dead_code)]
    pub exporter: InMemorySpanExporter,
    /// Backing store document, for tests that corrupt or inspect it.
    #[allow(dead_code)]
    pub store_path: PathBuf,
    _store_dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server with the default required-field set (`code`, `name`).
pub async fn start_server() -> TestServer {
    start_server_with_required(&["code", "name"]).await
}

/// Start a server with an explicit required-field set.
pub async fn start_server_with_required(required: &[&str]) -> TestServer {
    let store_dir = tempfile::tempdir().unwrap();

    let mut config = CatalogConfig::default();
    config.store.path = store_dir.path().join("course_catalog.json");
    config.telemetry.metrics_enabled = false;
    config.validation.required_fields = required.iter().map(|f| f.to_string()).collect();

    let exporter = InMemorySpanExporter::default();
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    let telemetry = Arc::new(Telemetry::with_provider(provider, "course-catalog-test"));
    let store = Arc::new(CatalogStore::new(&config.store.path));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store_path = config.store.path.clone();
    let server = HttpServer::new(config, telemetry, store);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    TestServer {
        addr,
        exporter,
        store_path,
        _store_dir: store_dir,
    }
}

/// Client that does not follow redirects, so tests can assert on the
/// redirect target and flash message directly.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
