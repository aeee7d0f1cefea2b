//! HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, state, routes)
//!     → middleware.rs (root span, timer, request id, client metadata)
//!     → handlers.rs (child span, store access, error handling)
//!     → views.rs (HTML rendering)
//!     → middleware.rs (duration metrics, completion log line)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod views;

pub use middleware::RequestContext;
pub use server::{AppState, HttpServer};
