//! Shared application state for the pushgate bridge.
//!
//! The measurement store is built exactly once here and handed to every
//! handler through axum's `State`; there is no process-wide singleton.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::obs::metrics::BridgeMetrics;
use crate::render::RenderEngine;
use crate::store::MeasurementStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<MeasurementStore>,
    renderer: RenderEngine,
    metrics: Arc<BridgeMetrics>,
}

struct AppStateInner {
    cfg: BridgeConfig,
}

impl AppState {
    pub fn new(cfg: BridgeConfig) -> Self {
        let store = Arc::new(MeasurementStore::new());
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            renderer: RenderEngine::new(Arc::clone(&store)),
            store,
            metrics: Arc::new(BridgeMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &BridgeConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<MeasurementStore> {
        Arc::clone(&self.store)
    }

    pub fn renderer(&self) -> &RenderEngine {
        &self.renderer
    }

    pub fn metrics(&self) -> Arc<BridgeMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Gauges computed at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("pushgate_store_identities", self.store.len() as u64)]
    }
}
