//! Router-level tests: push then scrape through the real axum stack.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures_util::future::join_all;
use tokio::sync::watch;
use tower::ServiceExt;

use pushgate_gateway::app_state::AppState;
use pushgate_gateway::config::{self, BridgeConfig};
use pushgate_gateway::render::unix_now;
use pushgate_gateway::router::build_router;
use pushgate_gateway::store::sweeper;

fn app() -> (AppState, Router) {
    let state = AppState::new(BridgeConfig::default());
    let router = build_router(state.clone());
    (state, router)
}

fn value_list(host: &str, value: f64) -> String {
    format!(
        r#"{{"values":[{value}],"dstypes":["gauge"],"dsnames":["value"],"time":{time},"interval":10,
            "host":"{host}","plugin":"swap","plugin_instance":"","type":"swap","type_instance":""}}"#,
        time = unix_now(),
    )
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn post(body: String) -> Request<Body> {
    Request::post("/collectd")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn push_then_scrape() {
    let (_, router) = app();

    let (status, body) = send(&router, post(format!("[{}]", value_list("h1", 42.0)))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let resp = router.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains("# TYPE collectd_swap gauge\n"));
    assert!(text.contains("collectd_swap{instance=\"h1\"} 42\n"));
    assert!(text.contains("pushgate_pushes_total{result=\"ok\"} 1\n"));
    assert!(text.contains("pushgate_store_identities 1\n"));
}

#[tokio::test]
async fn rejected_records_still_acknowledge() {
    let (state, router) = app();
    let bad = r#"{"values":[1,2],"dstypes":["gauge"],"dsnames":["value"],"time":1,"interval":10,
                  "host":"h","plugin":"load","type":"load"}"#;
    let body = format!("[{},{},{{\"host\":1}}]", value_list("h1", 1.0), bad);

    let (status, text) = send(&router, post(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "ok");

    let m = state.metrics();
    assert_eq!(m.records_accepted.get(&[]), 1);
    assert_eq!(m.records_rejected.get(&[("reason", "length_mismatch")]), 1);
    assert_eq!(m.records_rejected.get(&[("reason", "undecodable")]), 1);
    assert_eq!(state.store().len(), 1);
}

#[tokio::test]
async fn unparsable_body_is_bad_request() {
    let (state, router) = app();
    let (status, text) = send(&router, post("not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.starts_with("BAD_REQUEST"));
    assert_eq!(state.metrics().pushes.get(&[("result", "bad_request")]), 1);
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let cfg = config::load_from_str("version: 1\nbridge:\n  max_body_bytes: 1024\n").unwrap();
    let state = AppState::new(cfg);
    let router = build_router(state.clone());

    let big = format!("[{}]", vec![value_list("h1", 1.0); 20].join(","));
    assert!(big.len() > 1024);
    let (status, _) = send(&router, post(big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(state.store().is_empty());
}

#[tokio::test]
async fn concurrent_pushes_and_scrapes() {
    let (state, router) = app();

    let pushes = (0..32).map(|i| {
        let router = router.clone();
        async move { send(&router, post(format!("[{}]", value_list(&format!("h{}", i % 4), i as f64)))).await }
    });
    let scrapes = (0..8).map(|_| {
        let router = router.clone();
        async move { send(&router, get("/metrics")).await }
    });

    let (p, s) = tokio::join!(join_all(pushes), join_all(scrapes));
    assert!(p.iter().all(|(st, _)| *st == StatusCode::OK));
    assert!(s.iter().all(|(st, _)| *st == StatusCode::OK));
    assert_eq!(state.store().len(), 4);
}

#[tokio::test]
async fn label_conflicts_are_counted_on_scrape() {
    let (state, router) = app();
    let df = |pi: &str, ti: &str| {
        format!(
            r#"{{"values":[1],"dstypes":["gauge"],"dsnames":["value"],"time":{time},"interval":10,
                "host":"h","plugin":"df","plugin_instance":"{pi}","type":"df_complex","type_instance":"{ti}"}}"#,
            time = unix_now(),
        )
    };
    let body = format!("[{},{}]", df("root", "used"), df("", "free"));
    let (status, _) = send(&router, post(body)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, text) = send(&router, get("/metrics")).await;
    assert_eq!(text.matches("collectd_df_df_complex{").count(), 1);
    assert_eq!(state.metrics().samples_dropped.get(&[("reason", "label_conflict")]), 1);
}

#[tokio::test]
async fn ops_routes() {
    let (state, router) = app();

    let (status, body) = send(&router, get("/healthz")).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    let (status, body) = send(&router, get("/readyz")).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ready"));

    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("href=\"/metrics\""));

    let (status, _) = send(&router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    let m = state.metrics();
    assert_eq!(m.render_duration.count(&[]), 1);
    assert_eq!(m.stale_records.get(&[]), 0);

    state.set_draining();
    let (status, _) = send(&router, get("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (_, text) = send(&router, get("/metrics")).await;
    assert!(text.contains("pushgate_draining 1\n"));
}

#[tokio::test]
async fn sweeper_is_off_by_default_and_stops_on_shutdown() {
    let (state, _) = app();
    let (tx, rx) = watch::channel(false);
    assert!(sweeper::spawn(state.store(), state.metrics(), &state.cfg().eviction, rx).is_none());

    let cfg = config::load_from_str("version: 1\neviction:\n  enabled: true\n  sweep_interval_ms: 1000\n").unwrap();
    let rx = tx.subscribe();
    let handle = sweeper::spawn(state.store(), state.metrics(), &cfg.eviction, rx).unwrap();

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}
