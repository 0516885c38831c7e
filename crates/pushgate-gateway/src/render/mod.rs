//! Render engine: store snapshot -> metric families.
//!
//! Each pass takes a snapshot, drops records whose `time + 2 * interval` is
//! already behind `now` (they stay in the store), translates every sample
//! and groups samples by metric name. The first sample of a family fixes
//! its kind and its label key set; later samples that disagree are dropped.
//! Families come out in first-seen order over identity-ordered records, so a
//! given snapshot always renders the same way.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use pushgate_core::naming::translate;
use pushgate_core::MetricFamily;
use pushgate_core::Sample;

use crate::store::MeasurementStore;

/// Seconds since the epoch as collectd reports them.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[derive(Clone)]
pub struct RenderEngine {
    store: Arc<MeasurementStore>,
}

impl RenderEngine {
    pub fn new(store: Arc<MeasurementStore>) -> Self {
        Self { store }
    }

    pub fn render_all(&self) -> Families {
        self.render_at(unix_now())
    }

    /// Render as if the wall clock read `now`.
    pub fn render_at(&self, now: f64) -> Families {
        let snapshot = self.store.snapshot();

        let mut families: Vec<MetricFamily> = Vec::new();
        let mut label_keys: Vec<Vec<String>> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut stats = RenderStats::default();

        for (identity, record) in &snapshot {
            if !record.is_fresh_at(now) {
                stats.stale_records += 1;
                tracing::trace!(%identity, valid_until = record.valid_until(), "stale record skipped");
                continue;
            }

            for i in 0..record.len() {
                let Some(t) = translate(record, i) else {
                    stats.unknown_kind_samples += 1;
                    tracing::debug!(%identity, index = i, "sample with unknown ds type dropped");
                    continue;
                };

                let slot = *by_name.entry(t.name.clone()).or_insert_with(|| {
                    families.push(MetricFamily::new(t.name.clone(), t.help.clone(), t.kind));
                    label_keys.push(t.labels.keys().cloned().collect());
                    families.len() - 1
                });
                let family = &mut families[slot];

                if family.kind != t.kind {
                    stats.kind_conflict_samples += 1;
                    tracing::debug!(
                        %identity,
                        name = %family.name,
                        "sample kind disagrees with family, dropped"
                    );
                    continue;
                }
                if !label_keys[slot].iter().eq(t.labels.keys()) {
                    stats.label_conflict_samples += 1;
                    tracing::debug!(
                        %identity,
                        name = %family.name,
                        "sample label keys disagree with family, dropped"
                    );
                    continue;
                }

                family.samples.push(Sample {
                    labels: t.labels,
                    value: t.value,
                });
            }
        }

        Families {
            inner: families.into_iter(),
            stats,
        }
    }
}

/// Per-pass counters, exported as bridge self-metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub stale_records: usize,
    pub unknown_kind_samples: usize,
    pub kind_conflict_samples: usize,
    pub label_conflict_samples: usize,
}

/// Families produced by one render pass. Single traversal; call
/// `render_all` again for a fresh view.
pub struct Families {
    inner: std::vec::IntoIter<MetricFamily>,
    stats: RenderStats,
}

impl Families {
    pub fn stats(&self) -> RenderStats {
        self.stats
    }
}

impl Iterator for Families {
    type Item = MetricFamily;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Families {}
