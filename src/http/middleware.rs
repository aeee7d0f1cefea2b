//! Request instrumentation middleware.
//!
//! Wraps every dispatched request: opens the root span, times the request,
//! tags client metadata, and on completion records metrics and emits one
//! structured log line correlated to the span. Runs for every completed
//! response, redirects and error responses included.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::trace::SpanKind;
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::http::server::AppState;
use crate::observability::ActiveSpan;

/// Per-request context stashed in request extensions so handlers can parent
/// child spans and tag error logs. Dropped with the request.
#[derive(Clone)]
pub struct RequestContext {
    /// Handle to the root span of this request.
    pub span: ActiveSpan,
    /// Request id (uuid v4), also attached to the root span.
    pub request_id: String,
    /// Matched route template, e.g. `/course/{code}`.
    pub route: String,
    /// Client socket address.
    pub client: String,
}

pub async fn instrument_request(
    State(state): State<AppState>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    // The middleware is layered on the router, so routing has already run
    // and the matched route template sits in the request extensions.
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let request_id = Uuid::new_v4().to_string();

    let root = state.telemetry.span(
        route.clone(),
        SpanKind::Server,
        vec![
            KeyValue::new("http.method", method.to_string()),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("client.address", client.to_string()),
            KeyValue::new("request.id", request_id.clone()),
        ],
    );

    request.extensions_mut().insert(RequestContext {
        span: root.handle(),
        request_id: request_id.clone(),
        route: route.clone(),
        client: client.to_string(),
    });

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let status = response.status();
    let outcome = if status.is_server_error() { "error" } else { "ok" };

    root.set_attribute("http.status_code", i64::from(status.as_u16()));
    root.set_attribute("duration_ms", elapsed_ms);
    root.add_event(
        "request completed",
        vec![KeyValue::new("duration_ms", elapsed_ms)],
    );
    state.telemetry.metrics().record_request(&route, outcome, elapsed);

    tracing::info!(
        request_id = %request_id,
        method = %method,
        route = %route,
        status = status.as_u16(),
        duration_ms = elapsed_ms,
        client = %client,
        trace_id = %root.trace_id(),
        "Request completed"
    );

    // Root scope drops here, closing the span after the duration attribute
    // and event are attached.
    response
}
