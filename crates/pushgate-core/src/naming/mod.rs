//! Naming rules: collectd value list sample -> Prometheus sample.
//!
//! Every function here is pure. The disk-health rewrite is expressed as a
//! per-sample view (`SampleView`) instead of mutating the stored record, so
//! a snapshot can be translated without copying or locking.
//!
//! Rule order:
//! 1. disk-health rewrite (type, type instance and ds name change together)
//! 2. base name `collectd_<plugin>_<type>` (or `collectd_<type>` when equal)
//! 3. `_<dsname>` unless the ds name is `value`
//! 4. `_total` for counter/derive
//! 5. disk-health display-name remap of the type instance (label only)
//! 6. sanitize to `[A-Za-z0-9_:]`

pub mod remap;

use crate::exposition::{Labels, MetricKind};
use crate::record::{DsType, MeasurementRecord};

/// Prefix of every exported metric name.
pub const NAME_PREFIX: &str = "collectd";

/// Unified type for all disk-health attributes.
pub const DISK_HEALTH_TYPE: &str = "smart_attribute";

/// ds name forced on rewritten disk-health samples.
pub const PRETTY_DS_NAME: &str = "pretty";

const DISK_HEALTH_PREFIX: &str = "smart_";

/// Summary types emitted by the smart plugin that are folded into
/// `DISK_HEALTH_TYPE`.
const DISK_HEALTH_SUBTYPES: [&str; 4] = [
    "smart_poweron",
    "smart_powercycles",
    "smart_badsectors",
    "smart_temperature",
];

/// Label carrying the reporting host.
pub const INSTANCE_LABEL: &str = "instance";

/// Label used for the type instance when the plugin instance already took
/// the plugin-named slot.
pub const TYPE_LABEL: &str = "type";

/// One sample of a record, after the disk-health rewrite and remap.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleView<'a> {
    pub host: &'a str,
    pub plugin: &'a str,
    pub plugin_instance: Option<&'a str>,
    pub type_name: &'a str,
    pub type_instance: Option<&'a str>,
    pub ds_name: &'a str,
    pub ds_type: &'a DsType,
    pub value: f64,
}

impl<'a> SampleView<'a> {
    /// Build the view of sample `index`. `None` when the index is out of
    /// range for any of the per-sample vectors.
    pub fn new(record: &'a MeasurementRecord, index: usize) -> Option<Self> {
        let value = *record.values.get(index)?;
        let mut ds_name = record.ds_names.get(index)?.as_str();
        let ds_type = record.ds_types.get(index)?;

        let mut type_name = record.type_name.as_str();
        let mut type_instance = record.type_instance.as_deref();

        if let Some(suffix) = disk_health_subtype(type_name) {
            type_name = DISK_HEALTH_TYPE;
            type_instance = Some(suffix);
            ds_name = PRETTY_DS_NAME;
        }

        if type_name == DISK_HEALTH_TYPE {
            type_instance = type_instance.map(|ti| match remap::display_name(ti) {
                Some(display) => display,
                None => ti,
            });
        }

        Some(Self {
            host: &record.host,
            plugin: &record.plugin,
            plugin_instance: record.plugin_instance.as_deref(),
            type_name,
            type_instance,
            ds_name,
            ds_type,
            value,
        })
    }

    pub fn metric_name(&self) -> String {
        let mut name = String::from(NAME_PREFIX);
        name.push('_');
        if self.plugin != self.type_name {
            name.push_str(self.plugin);
            name.push('_');
        }
        name.push_str(self.type_name);

        if self.ds_name != "value" {
            name.push('_');
            name.push_str(self.ds_name);
        }
        if self.ds_type.is_cumulative() {
            name.push_str("_total");
        }
        sanitize_metric_name(&name)
    }

    pub fn labels(&self) -> Labels {
        let mut labels = Labels::new();
        let plugin_key = plugin_label_name(self.plugin);

        if let Some(pi) = self.plugin_instance {
            labels.insert(plugin_key.clone(), pi.to_string());
        }
        if let Some(ti) = self.type_instance {
            if self.plugin_instance.is_none() {
                labels.insert(plugin_key, ti.to_string());
            } else {
                labels.insert(TYPE_LABEL.to_string(), ti.to_string());
            }
        }
        labels.insert(INSTANCE_LABEL.to_string(), self.host.to_string());
        labels
    }

    pub fn help(&self) -> String {
        format!(
            "Collectd exporter: '{}' Type: '{}' Dstype: '{}' Dsname: '{}'",
            self.plugin, self.type_name, self.ds_type, self.ds_name
        )
    }

    pub fn kind(&self) -> Option<MetricKind> {
        derive_kind(self.ds_type)
    }
}

/// Fully translated sample, ready to be grouped into a family.
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub labels: Labels,
    pub value: f64,
}

/// Translate sample `index` of `record`. `None` for unknown ds types (the
/// sample is dropped, not an error) and out-of-range indices.
pub fn translate(record: &MeasurementRecord, index: usize) -> Option<Translated> {
    let view = SampleView::new(record, index)?;
    let kind = view.kind()?;
    Some(Translated {
        name: view.metric_name(),
        help: view.help(),
        kind,
        labels: view.labels(),
        value: view.value,
    })
}

pub fn derive_name(record: &MeasurementRecord, index: usize) -> Option<String> {
    SampleView::new(record, index).map(|v| v.metric_name())
}

pub fn derive_labels(record: &MeasurementRecord, index: usize) -> Option<Labels> {
    SampleView::new(record, index).map(|v| v.labels())
}

pub fn derive_help(record: &MeasurementRecord, index: usize) -> Option<String> {
    SampleView::new(record, index).map(|v| v.help())
}

pub fn derive_kind(ds_type: &DsType) -> Option<MetricKind> {
    match ds_type {
        DsType::Gauge => Some(MetricKind::Gauge),
        DsType::Counter | DsType::Derive => Some(MetricKind::Counter),
        DsType::Other(_) => None,
    }
}

/// Suffix after `smart_` when `type_name` is one of the folded subtypes.
fn disk_health_subtype(type_name: &str) -> Option<&str> {
    if DISK_HEALTH_SUBTYPES.contains(&type_name) {
        type_name.strip_prefix(DISK_HEALTH_PREFIX)
    } else {
        None
    }
}

/// Label key carrying the plugin/type instance. Prefixed with `plugin_`
/// when it would clash with `instance` or `type`.
pub fn plugin_label_name(plugin: &str) -> String {
    let key = sanitize_label_name(plugin);
    if key == INSTANCE_LABEL || key == TYPE_LABEL {
        format!("plugin_{key}")
    } else {
        key
    }
}

/// Replace every char outside `[A-Za-z0-9_:]` with `_`.
pub fn sanitize_metric_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == ':' { c } else { '_' })
        .collect()
}

/// Label names additionally exclude `:` and must not start with a digit.
pub fn sanitize_label_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
