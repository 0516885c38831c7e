//! Last-value measurement store.
//!
//! One `Mutex<HashMap>` keyed by measurement identity. The lock covers only
//! the merge of an already validated batch and the shallow copy taken by
//! `snapshot`; validation, identity derivation and every naming rule run
//! outside it. Records are stored as `Arc` so a snapshot shares them instead
//! of cloning sample vectors, and a reader can never see a half-merged
//! record.
//!
//! Ordering is by lock acquisition: the `ingest` that takes the lock last
//! wins for an identity, whatever the records' own `time` fields say.

pub mod sweeper;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pushgate_core::{MeasurementIdentity, MeasurementRecord, RejectReason};

/// Independent, identity-ordered copy of the store.
pub type Snapshot = BTreeMap<MeasurementIdentity, Arc<MeasurementRecord>>;

/// One refused entry of a push.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position in the pushed batch.
    pub index: usize,
    /// `None` when the entry never decoded into a record.
    pub identity: Option<MeasurementIdentity>,
    pub reason: RejectReason,
}

/// Outcome of one `ingest` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MeasurementStore {
    records: Mutex<HashMap<MeasurementIdentity, Arc<MeasurementRecord>>>,
}

impl MeasurementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert every well-formed record by identity. Malformed records are
    /// skipped and listed in the report; the rest of the batch still lands.
    pub fn ingest<I>(&self, batch: I) -> IngestReport
    where
        I: IntoIterator<Item = MeasurementRecord>,
    {
        let mut report = IngestReport::default();
        let mut ready = Vec::new();

        for (index, record) in batch.into_iter().enumerate() {
            let identity = record.identity();
            match record.validate() {
                Ok(()) => ready.push((identity, Arc::new(record))),
                Err(reason) => report.rejected.push(Rejection {
                    index,
                    identity: Some(identity),
                    reason,
                }),
            }
        }

        report.accepted = ready.len();
        if !ready.is_empty() {
            let mut map = self.lock();
            map.extend(ready);
        }
        report
    }

    /// Copy of the current contents; no lock is held once this returns.
    pub fn snapshot(&self) -> Snapshot {
        let copied: Vec<_> = {
            let map = self.lock();
            map.iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v)))
                .collect()
        };
        copied.into_iter().collect()
    }

    pub fn get(&self, identity: &MeasurementIdentity) -> Option<Arc<MeasurementRecord>> {
        self.lock().get(identity).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove records with `now > time + factor * interval`. Returns the
    /// number removed.
    pub fn evict_older_than(&self, now: f64, factor: f64) -> usize {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, r| now <= r.time + factor * r.interval);
        before - map.len()
    }

    // The critical sections above cannot leave the map half-updated, so a
    // poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, HashMap<MeasurementIdentity, Arc<MeasurementRecord>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
