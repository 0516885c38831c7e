//! Periodic eviction of identities that stopped reporting.
//!
//! Disabled unless `eviction.enabled` is set. The render path never depends
//! on it: a stale record is already hidden from scrapes, the sweep only
//! bounds memory for churning hosts.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

use crate::config::EvictionSection;
use crate::obs::metrics::BridgeMetrics;
use crate::render::unix_now;
use crate::store::MeasurementStore;

/// Run one sweep at `now`. Returns the number of evicted identities.
pub fn sweep_once(store: &MeasurementStore, metrics: &BridgeMetrics, now: f64, factor: f64) -> usize {
    let evicted = store.evict_older_than(now, factor);
    if evicted > 0 {
        metrics.records_evicted.add(&[], evicted as u64);
        tracing::info!(evicted, remaining = store.len(), "evicted stale identities");
    }
    evicted
}

/// Spawn the sweeper. Returns `None` when eviction is disabled. The task
/// ends once `shutdown` flips to `true` or its sender is dropped.
pub fn spawn(
    store: Arc<MeasurementStore>,
    metrics: Arc<BridgeMetrics>,
    cfg: &EvictionSection,
    mut shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    if !cfg.enabled {
        return None;
    }

    let every = Duration::from_millis(cfg.sweep_interval_ms);
    let factor = cfg.stale_factor;

    Some(tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick fires immediately; nothing can be stale yet
        tick.tick().await;

        tracing::info!(interval_ms = every.as_millis() as u64, factor, "eviction sweeper started");
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    sweep_once(&store, &metrics, unix_now(), factor);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("eviction sweeper stopped");
    }))
}
