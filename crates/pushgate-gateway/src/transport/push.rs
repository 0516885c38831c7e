//! collectd push endpoint (`POST /collectd`).
//!
//! Decode once, ingest, acknowledge. Per-record rejections never fail the
//! response: collectd retries a failed POST with the whole batch, which
//! would only replay the same bad records. They are counted and logged
//! instead. Only an unparsable body is answered with an error status.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use pushgate_core::error::{ClientCode, PushgateError};
use pushgate_core::protocol::decode_batch;
use pushgate_core::RejectReason;

use crate::app_state::AppState;
use crate::store::{IngestReport, Rejection};

pub async fn push(State(app): State<AppState>, body: Bytes) -> Response {
    let decoded = match decode_batch(&body) {
        Ok(d) => d,
        Err(e) => {
            app.metrics().pushes.inc(&[("result", "bad_request")]);
            tracing::warn!(error = %e, bytes = body.len(), "push rejected");
            return error_response(&e);
        }
    };

    let mut report = app.store().ingest(decoded.records);
    merge_undecodable(&mut report, decoded.rejected);
    record_outcome(&app, &report);

    (StatusCode::OK, "ok").into_response()
}

/// Decode failures carry positions in the raw batch; fold them into the
/// store's report so callers see one list.
fn merge_undecodable(report: &mut IngestReport, rejected: Vec<(usize, RejectReason)>) {
    report
        .rejected
        .extend(rejected.into_iter().map(|(index, reason)| Rejection {
            index,
            identity: None,
            reason,
        }));
}

fn record_outcome(app: &AppState, report: &IngestReport) {
    let m = app.metrics();
    m.pushes.inc(&[("result", "ok")]);
    m.records_accepted.add(&[], report.accepted as u64);

    for r in &report.rejected {
        m.records_rejected.inc(&[("reason", r.reason.as_str())]);
        tracing::debug!(
            index = r.index,
            identity = r.identity.as_ref().map(|i| i.as_str()).unwrap_or("-"),
            reason = %r.reason,
            "value list rejected"
        );
    }

    if report.is_clean() {
        tracing::trace!(accepted = report.accepted, "push ingested");
    } else {
        tracing::warn!(
            accepted = report.accepted,
            rejected = report.rejected.len(),
            "push ingested with rejected value lists"
        );
    }
}

fn error_response(e: &PushgateError) -> Response {
    let code = e.client_code();
    let status = match code {
        ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, format!("{}: {}", code.as_str(), e)).into_response()
}
