//! Request instrumentation: one `request` span per call, carrying the
//! resolved caller, and a single `http_request_finished` event when the
//! response is ready.

use crate::api::AppState;
use crate::domain::{Caller, Role};
use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span, field, info, info_span};
use uuid::Uuid;

/// The `request` span, shared through request extensions so inner layers
/// can fill in fields after `TraceLayer` has entered its own span.
#[derive(Clone)]
pub struct RequestSpan(pub Span);

/// `GET /api/metrics`
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics exporter is disabled".to_string(),
        PrometheusHandle::render,
    )
}

/// Opens the `request` span. `user_id` and `role` stay empty until the
/// caller is resolved.
#[must_use]
pub fn request_span(request_id: &str, method: &str, path: &str, route: Option<&str>) -> Span {
    info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route,
        user_id = field::Empty,
        role = field::Empty,
    )
}

/// Stamps the resolved caller onto the request span.
pub fn record_caller(span: &Span, caller: &Caller) {
    span.record("user_id", caller.id.value());
    span.record("role", caller.role.as_str());
}

fn outcome(status: u16) -> &'static str {
    if status >= 500 {
        "error"
    } else if status >= 400 {
        "client_error"
    } else {
        "success"
    }
}

/// Wraps each call in a [`RequestSpan`] and records HTTP metrics labelled
/// by route template, status and caller role.
pub async fn request_middleware(mut req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = request_span(&request_id, &method, &path, route.as_deref());
    req.extensions_mut().insert(RequestSpan(span.clone()));

    async move {
        let response = next.run(req).await;

        let status = response.status().as_u16();
        let role = response
            .extensions()
            .get::<Role>()
            .map_or("anonymous", Role::as_str);

        // Unmatched paths share one label to keep cardinality bounded
        let labels = [
            ("method", method),
            ("route", route.unwrap_or_else(|| "unmatched".to_string())),
            ("status", status.to_string()),
            ("role", role.to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            status_code = status,
            caller_role = role,
            user_agent = %user_agent,
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use std::sync::Mutex;
    use tracing::Subscriber;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};

    /// Collects `(span, field, value)` for every recorded span field.
    #[derive(Clone, Default)]
    struct FieldCapture(Arc<Mutex<Vec<(String, String, String)>>>);

    struct Collect<'a> {
        span: &'a str,
        out: &'a mut Vec<(String, String, String)>,
    }

    impl Visit for Collect<'_> {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.out
                .push((self.span.to_string(), field.name().to_string(), format!("{value:?}")));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.out
                .push((self.span.to_string(), field.name().to_string(), value.to_string()));
        }
    }

    impl<S> Layer<S> for FieldCapture
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            let mut out = self.0.lock().unwrap();
            attrs.record(&mut Collect {
                span: attrs.metadata().name(),
                out: &mut out,
            });
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            let name = ctx.span(id).map(|s| s.name()).unwrap_or_default();
            let mut out = self.0.lock().unwrap();
            values.record(&mut Collect {
                span: name,
                out: &mut out,
            });
        }
    }

    impl FieldCapture {
        fn value(&self, span: &str, field: &str) -> Option<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(s, f, _)| s == span && f == field)
                .map(|(_, _, v)| v.clone())
        }
    }

    #[test]
    fn caller_is_recorded_on_request_span() {
        let capture = FieldCapture::default();
        let subscriber = Registry::default().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let span = request_span("req-1", "GET", "/api/plannings", Some("/api/plannings"));
            let caller = Caller::new(UserId::new(7), "manon@example.com", Role::Manager);

            // Another span is current, as it is under `TraceLayer`
            let _inner = info_span!("request_inner").entered();
            record_caller(&span, &caller);
        });

        assert_eq!(capture.value("request", "user_id").as_deref(), Some("7"));
        assert_eq!(capture.value("request", "role").as_deref(), Some("manager"));
        assert_eq!(capture.value("request", "route").as_deref(), Some("/api/plannings"));
    }

    #[test]
    fn outcome_follows_status_class() {
        assert_eq!(outcome(200), "success");
        assert_eq!(outcome(404), "client_error");
        assert_eq!(outcome(503), "error");
    }
}
