//! Course catalog web service.
//!
//! A minimal catalog of courses (list, add, view) persisted in a flat JSON
//! file, with request tracing and metrics instrumentation layered on top of
//! every handler.

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod store;

pub use config::CatalogConfig;
pub use error::CatalogError;
pub use http::HttpServer;
pub use observability::{Metrics, SpanScope, Telemetry};
pub use store::{CatalogStore, Course};
