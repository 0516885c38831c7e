//! collectd `write_http` JSON value lists.
//!
//! A push body is a JSON array of objects:
//!
//! ```json
//! [{"values":[1901474177],"dstypes":["counter"],"dsnames":["value"],
//!   "time":1280959128,"interval":10,"host":"leeloo.octo.it",
//!   "plugin":"cpu","plugin_instance":"0","type":"cpu","type_instance":"idle"}]
//! ```
//!
//! Empty `plugin_instance`/`type_instance` mean "absent". collectd writes
//! `null` for NaN samples. camelCase keys are accepted as aliases.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PushgateError, Result};
use crate::record::{DsType, MeasurementRecord, RejectReason};

/// One value list as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueList {
    pub values: Vec<Option<f64>>,
    #[serde(alias = "dsTypes")]
    pub dstypes: Vec<String>,
    #[serde(alias = "dsNames")]
    pub dsnames: Vec<String>,
    pub time: f64,
    pub interval: f64,
    pub host: String,
    pub plugin: String,
    #[serde(default, alias = "pluginInstance")]
    pub plugin_instance: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, alias = "typeInstance")]
    pub type_instance: String,
}

impl ValueList {
    /// Convert to the internal model. Invariants are checked by `ingest`,
    /// not here.
    pub fn into_record(self) -> MeasurementRecord {
        MeasurementRecord {
            host: self.host,
            plugin: self.plugin,
            plugin_instance: non_empty(self.plugin_instance),
            type_name: self.type_name,
            type_instance: non_empty(self.type_instance),
            time: self.time,
            interval: self.interval,
            values: self.values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            ds_names: self.dsnames,
            ds_types: self.dstypes.iter().map(|s| DsType::parse(s)).collect(),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Result of decoding one push body.
#[derive(Debug, Default)]
pub struct DecodedBatch {
    pub records: Vec<MeasurementRecord>,
    /// `(position in the batch, reason)` for entries that did not decode.
    pub rejected: Vec<(usize, RejectReason)>,
}

/// Decode a push body. Fails only when the body is not a JSON array; bad
/// elements are reported in `DecodedBatch::rejected`.
pub fn decode_batch(body: &Bytes) -> Result<DecodedBatch> {
    if body.is_empty() {
        return Err(PushgateError::BadRequest("empty push body".into()));
    }

    let items: Vec<Value> = serde_json::from_slice(body)
        .map_err(|e| PushgateError::BadRequest(format!("invalid value list json: {e}")))?;

    let mut out = DecodedBatch {
        records: Vec::with_capacity(items.len()),
        rejected: Vec::new(),
    };
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ValueList>(item) {
            Ok(vl) => out.records.push(vl.into_record()),
            Err(e) => out
                .rejected
                .push((idx, RejectReason::Undecodable(e.to_string()))),
        }
    }
    Ok(out)
}
