//! Measurement record model.
//!
//! A `MeasurementRecord` is one collectd value list after wire decoding:
//! absent plugin/type instances are `None` rather than empty strings, and
//! data-source types are typed. Records are immutable once stored; the
//! gateway shares them behind `Arc` so snapshots never copy sample vectors.

use std::fmt;

use thiserror::Error;

/// Factor applied to a record's interval to decide how long it stays valid.
pub const STALE_MULTIPLIER: f64 = 2.0;

/// Data-source type of one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DsType {
    Gauge,
    Counter,
    Derive,
    /// Any other collectd type (e.g. `absolute`). Carried through ingest and
    /// dropped at render time.
    Other(String),
}

impl DsType {
    pub fn parse(s: &str) -> Self {
        match s {
            "gauge" => DsType::Gauge,
            "counter" => DsType::Counter,
            "derive" => DsType::Derive,
            other => DsType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DsType::Gauge => "gauge",
            DsType::Counter => "counter",
            DsType::Derive => "derive",
            DsType::Other(s) => s,
        }
    }

    /// Cumulative types get the `_total` suffix and a counter `# TYPE`.
    pub fn is_cumulative(&self) -> bool {
        matches!(self, DsType::Counter | DsType::Derive)
    }
}

impl fmt::Display for DsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store key: `host/plugin[-plugin_instance]/type[-type_instance]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasurementIdentity(String);

impl MeasurementIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeasurementIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a record was refused by `ingest`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RejectReason {
    #[error("length mismatch: values={values} dsnames={ds_names} dstypes={ds_types}")]
    LengthMismatch {
        values: usize,
        ds_names: usize,
        ds_types: usize,
    },
    #[error("interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),
    #[error("undecodable value list: {0}")]
    Undecodable(String),
}

impl RejectReason {
    /// Short label used for self-metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::LengthMismatch { .. } => "length_mismatch",
            RejectReason::InvalidInterval(_) => "invalid_interval",
            RejectReason::Undecodable(_) => "undecodable",
        }
    }
}

/// One collectd value list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub host: String,
    pub plugin: String,
    pub plugin_instance: Option<String>,
    pub type_name: String,
    pub type_instance: Option<String>,
    /// Seconds since the epoch.
    pub time: f64,
    /// Reporting interval in seconds.
    pub interval: f64,
    pub values: Vec<f64>,
    pub ds_names: Vec<String>,
    pub ds_types: Vec<DsType>,
}

impl MeasurementRecord {
    pub fn identity(&self) -> MeasurementIdentity {
        let mut key = String::with_capacity(
            self.host.len() + self.plugin.len() + self.type_name.len() + 16,
        );
        key.push_str(&self.host);
        key.push('/');
        key.push_str(&self.plugin);
        if let Some(pi) = &self.plugin_instance {
            key.push('-');
            key.push_str(pi);
        }
        key.push('/');
        key.push_str(&self.type_name);
        if let Some(ti) = &self.type_instance {
            key.push('-');
            key.push_str(ti);
        }
        MeasurementIdentity(key)
    }

    /// Check the per-record invariants `ingest` relies on.
    pub fn validate(&self) -> Result<(), RejectReason> {
        let (values, ds_names, ds_types) =
            (self.values.len(), self.ds_names.len(), self.ds_types.len());
        if values != ds_names || values != ds_types {
            return Err(RejectReason::LengthMismatch {
                values,
                ds_names,
                ds_types,
            });
        }
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(RejectReason::InvalidInterval(self.interval));
        }
        Ok(())
    }

    /// Last instant (epoch seconds) at which this record may be scraped.
    pub fn valid_until(&self) -> f64 {
        self.time + STALE_MULTIPLIER * self.interval
    }

    /// Inclusive at the boundary: `now == valid_until()` is still fresh.
    pub fn is_fresh_at(&self, now: f64) -> bool {
        now <= self.valid_until()
    }

    /// Number of samples (only meaningful after `validate`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
