//! pushgate bridge
//!
//! - collectd `write_http` JSON on POST /collectd
//! - Prometheus scrape on GET /metrics
//! - optional eviction sweeper
//! - graceful shutdown on Ctrl-C (readyz flips to 503 first)

use std::net::SocketAddr;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use pushgate_core::error::{PushgateError, Result};
use pushgate_gateway::{app_state, config, router, store};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "pushgate exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_startup()?;
    let listen: SocketAddr = cfg
        .bridge
        .listen
        .parse()
        .map_err(|e| PushgateError::BadRequest(format!("bridge.listen: {e}")))?;

    let state = app_state::AppState::new(cfg);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = store::sweeper::spawn(
        state.store(),
        state.metrics(),
        &state.cfg().eviction,
        shutdown_rx,
    );

    let app = router::build_router(state.clone());

    tracing::info!(%listen, "pushgate starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PushgateError::Internal(format!("bind {listen} failed: {e}")))?;

    let drain_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
            drain_state.set_draining();
            tracing::info!("shutdown requested, draining");
        })
        .await
        .map_err(|e| PushgateError::Internal(format!("server failed: {e}")))?;

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    tracing::info!("pushgate stopped");
    Ok(())
}
