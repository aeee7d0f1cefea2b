//! Scoped span management.
//!
//! A [`SpanScope`] owns one span for the duration of one logical operation.
//! The span is closed exactly once when the scope is dropped, so every exit
//! path out of the operation (normal return, domain failure, propagated
//! error) ends the span. Closing a child scope never closes its parent.

use std::borrow::Cow;

use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, Key, KeyValue, Value};
use opentelemetry_sdk::trace::SdkTracer;

/// Cloneable handle to a live span, used to parent child scopes and to
/// correlate log lines. Holding an `ActiveSpan` does not keep the span open.
#[derive(Debug, Clone)]
pub struct ActiveSpan(pub(crate) Context);

/// RAII scope around one span.
///
/// Created through [`Telemetry::span`](crate::observability::Telemetry::span)
/// or [`Telemetry::child_span`](crate::observability::Telemetry::child_span).
#[derive(Debug)]
pub struct SpanScope {
    cx: Context,
    ended: bool,
}

impl SpanScope {
    pub(crate) fn start(
        tracer: &SdkTracer,
        parent: Option<&Context>,
        name: impl Into<Cow<'static, str>>,
        kind: SpanKind,
        attributes: Vec<KeyValue>,
    ) -> Self {
        let parent_cx = parent.cloned().unwrap_or_else(Context::new);
        let span = tracer
            .span_builder(name)
            .with_kind(kind)
            .with_attributes(attributes)
            .start_with_context(tracer, &parent_cx);

        Self {
            cx: parent_cx.with_span(span),
            ended: false,
        }
    }

    /// Attach or overwrite one attribute on the span.
    pub fn set_attribute(&self, key: impl Into<Key>, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    /// Add a timestamped event to the span.
    pub fn add_event(&self, name: impl Into<Cow<'static, str>>, attributes: Vec<KeyValue>) {
        self.cx.span().add_event(name, attributes);
    }

    /// Mark the span's terminal status as error and attach the description
    /// as an error attribute plus an exception event.
    pub fn record_error(&self, description: &str) {
        let span = self.cx.span();
        span.set_status(Status::error(description.to_string()));
        span.set_attribute(KeyValue::new("error", true));
        span.add_event(
            "exception",
            vec![KeyValue::new("exception.message", description.to_string())],
        );
    }

    /// Handle for parenting child scopes under this span.
    pub fn handle(&self) -> ActiveSpan {
        ActiveSpan(self.cx.clone())
    }

    /// Hex trace id of this span, for log correlation.
    pub fn trace_id(&self) -> String {
        self.cx.span().span_context().trace_id().to_string()
    }

    /// Hex span id of this span.
    pub fn span_id(&self) -> String {
        self.cx.span().span_context().span_id().to_string()
    }

    /// Close the span. Idempotent; also runs on drop, so calling it is
    /// only needed to end a span before the scope goes out of scope.
    pub fn end(&mut self) {
        if !self.ended {
            self.cx.span().end();
            self.ended = true;
        }
    }
}

impl Drop for SpanScope {
    fn drop(&mut self) {
        self.end();
    }
}
