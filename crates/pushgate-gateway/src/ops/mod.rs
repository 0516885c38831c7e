//! Operational HTTP endpoints.
//!
//! - `/`        : landing page
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 when draining)
//! - `/metrics` : translated collectd values + bridge metrics, Prometheus text

use std::time::Instant;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use pushgate_core::exposition::{self, CONTENT_TYPE};

use crate::app_state::AppState;

const INDEX_HTML: &str = r#"<html>
<head><title>pushgate</title></head>
<body>
<h1>pushgate</h1>
<p>collectd pushes to <code>POST /collectd</code>.</p>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_draining() {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    } else {
        (StatusCode::OK, "ready")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let families: Vec<_> = {
        let families = state.renderer().render_all();
        let stats = families.stats();
        let m = state.metrics();
        m.stale_records.set(&[], stats.stale_records as i64);
        if stats.unknown_kind_samples > 0 {
            m.samples_dropped
                .add(&[("reason", "unknown_kind")], stats.unknown_kind_samples as u64);
        }
        if stats.kind_conflict_samples > 0 {
            m.samples_dropped
                .add(&[("reason", "kind_conflict")], stats.kind_conflict_samples as u64);
        }
        if stats.label_conflict_samples > 0 {
            m.samples_dropped
                .add(&[("reason", "label_conflict")], stats.label_conflict_samples as u64);
        }
        families.collect()
    };

    let mut body = String::new();
    exposition::encode(&families, &mut body);

    let m = state.metrics();
    m.scrapes.inc(&[]);
    m.render_duration.observe(&[], started.elapsed());
    m.render(&state.metrics_extra(), &mut body);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}
