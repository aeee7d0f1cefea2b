//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the catalog
//! service. All types derive Serde traits for deserialization from config
//! files, and every field has a default so a minimal config works.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the course catalog service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Catalog store settings.
    pub store: StoreConfig,

    /// Telemetry export settings.
    pub telemetry: TelemetryConfig,

    /// Required-field policy for course submission.
    pub validation: ValidationConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Catalog store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON document holding the course list.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("course_catalog.json"),
        }
    }
}

/// Telemetry export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every exported span.
    pub service_name: String,

    /// OTLP collector endpoint for span export.
    pub otlp_endpoint: String,

    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Listen address for Prometheus scrapes.
    pub metrics_address: String,

    /// Optional log file; log lines also go to stdout.
    pub log_file: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "course-catalog-service".to_string(),
            otlp_endpoint: "http://localhost:4317".to_string(),
            metrics_enabled: true,
            metrics_address: "127.0.0.1:9100".to_string(),
            log_file: None,
        }
    }
}

/// Required-field policy for the add-course form.
///
/// The two observed deployments of this service disagreed on whether
/// `instructor` is required, so the set is configuration rather than a
/// hardcoded invariant.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Form fields that must be present and non-empty.
    pub required_fields: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_fields: vec!["code".to_string(), "name".to_string()],
        }
    }
}
