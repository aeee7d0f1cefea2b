//! Span lifecycle tests against a running server, using the in-memory span
//! exporter: every request opens and closes exactly one root span, handler
//! operations run as children of it, and domain failures are recorded as
//! errored spans with a nested diagnostic span.

use opentelemetry::trace::{SpanKind, Status};
use std::time::Duration;

mod common;

/// Spans finish as the response is written; give the exporter a moment.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn test_one_root_span_per_request() {
    let server = common::start_server().await;
    let client = common::client();

    client.get(server.url("/catalog")).send().await.unwrap();
    client.get(server.url("/")).send().await.unwrap();
    client.get(server.url("/health")).send().await.unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();
    let roots: Vec<_> = spans
        .iter()
        .filter(|s| s.span_kind == SpanKind::Server)
        .collect();
    assert_eq!(roots.len(), 3, "exactly one root span per request");
}

#[tokio::test]
async fn test_catalog_span_has_course_count_and_no_error() {
    let server = common::start_server().await;
    let client = common::client();

    client.get(server.url("/catalog")).send().await.unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();
    let root = spans
        .iter()
        .find(|s| s.span_kind == SpanKind::Server)
        .expect("root span");
    let child = spans
        .iter()
        .find(|s| s.name == "course_catalog")
        .expect("handler span");

    assert_eq!(child.parent_span_id, root.span_context.span_id());
    assert!(child
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "total_courses"
            && kv.value == opentelemetry::Value::I64(0)));
    assert!(!child.attributes.iter().any(|kv| kv.key.as_str() == "error"));
    assert!(matches!(child.status, Status::Unset));
}

#[tokio::test]
async fn test_root_span_records_timing_and_client() {
    let server = common::start_server().await;
    let client = common::client();

    client.get(server.url("/catalog")).send().await.unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();
    let root = spans
        .iter()
        .find(|s| s.span_kind == SpanKind::Server)
        .unwrap();

    let duration = root
        .attributes
        .iter()
        .find(|kv| kv.key.as_str() == "duration_ms")
        .expect("duration attribute");
    match duration.value {
        opentelemetry::Value::F64(ms) => assert!(ms >= 0.0),
        ref other => panic!("unexpected duration value {other:?}"),
    }
    assert!(root
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "client.address"));
    assert!(format!("{:?}", root.events).contains("request completed"));
}

#[tokio::test]
async fn test_add_course_form_render_is_traced() {
    let server = common::start_server().await;
    let client = common::client();

    client.get(server.url("/add_course")).send().await.unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();
    let root = spans
        .iter()
        .find(|s| s.span_kind == SpanKind::Server)
        .expect("root span");
    let op = spans
        .iter()
        .find(|s| s.name == "add_course")
        .expect("form render span");
    assert_eq!(op.parent_span_id, root.span_context.span_id());
    assert!(matches!(op.status, Status::Unset));
}

#[tokio::test]
async fn test_missing_fields_failure_is_traced() {
    let server = common::start_server().await;
    let client = common::client();

    client
        .post(server.url("/add_course"))
        .form(&[("semester", "Fall 2026")])
        .send()
        .await
        .unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();

    let op = spans.iter().find(|s| s.name == "add_course").unwrap();
    assert!(op
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "error.type"
            && kv.value.as_str() == "missing_fields"));
    assert!(op
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "missing_fields"
            && kv.value.as_str() == "code, name"));

    let diag = spans.iter().find(|s| s.name == "validation_failure").unwrap();
    assert_eq!(diag.parent_span_id, op.span_context.span_id());
    assert!(matches!(diag.status, Status::Error { .. }));
}

#[tokio::test]
async fn test_not_found_failure_is_traced() {
    let server = common::start_server().await;
    let client = common::client();

    client
        .get(server.url("/course/CS999"))
        .send()
        .await
        .unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();

    let op = spans.iter().find(|s| s.name == "course_details").unwrap();
    assert!(op
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "error.type" && kv.value.as_str() == "not_found"));

    let diag = spans.iter().find(|s| s.name == "lookup_failure").unwrap();
    assert!(matches!(diag.status, Status::Error { .. }));
    assert!(format!("{:?}", diag.events).contains("CS999"));
}

#[tokio::test]
async fn test_viewed_course_attribute_on_success() {
    let server = common::start_server().await;
    let client = common::client();

    client
        .post(server.url("/add_course"))
        .form(&[("code", "CS101"), ("name", "Intro")])
        .send()
        .await
        .unwrap();
    client
        .get(server.url("/course/CS101"))
        .send()
        .await
        .unwrap();
    settle().await;

    let spans = server.exporter.get_finished_spans().unwrap();
    let op = spans.iter().find(|s| s.name == "course_details").unwrap();
    assert!(op
        .attributes
        .iter()
        .any(|kv| kv.key.as_str() == "viewed_course" && kv.value.as_str() == "Intro"));
    assert!(matches!(op.status, Status::Unset));
}
