//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request middleware and handlers produce:
//!     → span.rs (scoped spans: attributes, events, error status)
//!     → metrics.rs (counters, histograms by route/outcome)
//!     → structured log lines correlated by trace id
//!
//! Consumers:
//!     → telemetry.rs (OTLP batch export of spans)
//!     → Prometheus scrape endpoint (metrics)
//!     → stdout / log file (tracing subscriber, set up in main)
//! ```
//!
//! # Design Decisions
//! - One telemetry context object built at startup and passed by handle;
//!   request code does not use ambient global lookups
//! - Spans close exactly once, on scope drop, on every exit path
//! - Metric recording never fails the request that records it
//! - Span export is batched off the request thread

pub mod metrics;
pub mod span;
pub mod telemetry;

pub use metrics::Metrics;
pub use span::{ActiveSpan, SpanScope};
pub use telemetry::{Telemetry, TelemetryError};
