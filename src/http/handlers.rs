//! Request handlers for the catalog routes.
//!
//! Every logical operation follows the same instrumentation pattern: open a
//! named child span under the middleware's root span, perform the domain
//! action through the store, enrich the span with domain attributes, and on
//! domain failure run the shared failure path (span error tagging, error
//! counter, nested diagnostic span, structured error log, flash + redirect
//! to a fallback view).

use axum::extract::{Extension, Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use opentelemetry::trace::SpanKind;
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::http::middleware::RequestContext;
use crate::http::server::AppState;
use crate::http::views::{self, Flash};
use crate::observability::SpanScope;
use crate::store::Course;

/// Flash message carried across a redirect as query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct FlashQuery {
    flash: Option<String>,
    level: Option<String>,
}

impl FlashQuery {
    fn as_flash(&self) -> Option<Flash<'_>> {
        self.flash.as_deref().map(|message| Flash {
            message,
            level: self.level.as_deref().unwrap_or("error"),
        })
    }
}

fn redirect_with_flash(path: &str, message: &str, level: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("flash", message)
        .append_pair("level", level)
        .finish();
    Redirect::to(&format!("{path}?{query}"))
}

/// Shared failure path for domain errors, per the error handling design:
/// tag the operation span, count the error, open a short-lived diagnostic
/// span with the recorded error, and log one structured error line. The
/// caller surfaces the flash message and redirect.
fn record_failure(state: &AppState, ctx: &RequestContext, scope: &SpanScope, err: &CatalogError) {
    scope.set_attribute("error", true);
    scope.set_attribute("error.type", err.error_type());
    match err {
        CatalogError::Validation { fields } => {
            scope.set_attribute("missing_fields", fields.join(", "));
        }
        CatalogError::NotFound { code } => {
            scope.set_attribute("course.code", code.clone());
        }
        CatalogError::Store(_) => {}
    }

    state.telemetry.metrics().record_error(&ctx.route, err.error_type());

    let diag_name = match err {
        CatalogError::Validation { .. } => "validation_failure",
        CatalogError::NotFound { .. } => "lookup_failure",
        CatalogError::Store(_) => "store_failure",
    };
    let diag = state
        .telemetry
        .child_span(&scope.handle(), diag_name, SpanKind::Internal, vec![]);
    diag.record_error(&err.to_string());
    diag.add_event(
        "operation failed",
        vec![KeyValue::new("error.type", err.error_type())],
    );
    drop(diag);

    tracing::error!(
        request_id = %ctx.request_id,
        route = %ctx.route,
        client = %ctx.client,
        error_type = err.error_type(),
        error = %err,
        "Catalog operation failed"
    );
}

fn fail(state: &AppState, ctx: &RequestContext, scope: &SpanScope, err: CatalogError) -> Response {
    record_failure(state, ctx, scope, &err);
    redirect_with_flash(err.fallback_path(), &err.to_string(), "error").into_response()
}

pub async fn index(Query(flash): Query<FlashQuery>) -> Html<String> {
    Html(views::index(flash.as_flash().as_ref()))
}

pub async fn course_catalog(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(flash): Query<FlashQuery>,
) -> Response {
    let scope = state
        .telemetry
        .child_span(&ctx.span, "course_catalog", SpanKind::Internal, vec![]);

    match state.store.read_all().await {
        Ok(courses) => {
            scope.set_attribute("total_courses", courses.len() as i64);
            Html(views::catalog(&courses, flash.as_flash().as_ref())).into_response()
        }
        Err(e) => {
            // Redirecting the catalog view to itself would loop, so render
            // an empty catalog with an error banner instead.
            let err = CatalogError::from(e);
            record_failure(&state, &ctx, &scope, &err);
            let message = err.to_string();
            let banner = Flash {
                message: &message,
                level: "error",
            };
            Html(views::catalog(&[], Some(&banner))).into_response()
        }
    }
}

pub async fn add_course_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(flash): Query<FlashQuery>,
) -> Html<String> {
    // The add-course operation is traced on the form render as well as on
    // the submission.
    let _scope = state
        .telemetry
        .child_span(&ctx.span, "add_course", SpanKind::Internal, vec![]);
    Html(views::add_course_form(flash.as_flash().as_ref()))
}

pub async fn add_course(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Form(form): Form<Course>,
) -> Response {
    let scope = state
        .telemetry
        .child_span(&ctx.span, "add_course", SpanKind::Internal, vec![]);

    let missing: Vec<String> = state
        .required_fields
        .iter()
        .filter(|f| form.field(f).is_none_or(|v| v.trim().is_empty()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return fail(
            &state,
            &ctx,
            &scope,
            CatalogError::Validation { fields: missing },
        );
    }

    let name = form.name.clone();
    match state.store.append(form).await {
        Ok(()) => {
            scope.set_attribute("course.added", name.clone());
            redirect_with_flash(
                "/catalog",
                &format!("Course '{name}' added successfully!"),
                "success",
            )
            .into_response()
        }
        Err(e) => fail(&state, &ctx, &scope, CatalogError::from(e)),
    }
}

pub async fn course_details(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(code): Path<String>,
) -> Response {
    let scope = state
        .telemetry
        .child_span(&ctx.span, "course_details", SpanKind::Internal, vec![]);
    scope.set_attribute("course.code", code.clone());

    let courses = match state.store.read_all().await {
        Ok(courses) => courses,
        Err(e) => return fail(&state, &ctx, &scope, CatalogError::from(e)),
    };

    // Duplicate codes are permitted by the store; the first match wins.
    match courses.into_iter().find(|c| c.code == code) {
        Some(course) => {
            scope.set_attribute("viewed_course", course.name.clone());
            Html(views::course_details(&course)).into_response()
        }
        None => fail(&state, &ctx, &scope, CatalogError::NotFound { code }),
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}
