//! Bridge self-observability.
//!
//! Counters for pushes, rejections, drops and evictions, rendered after the
//! translated collectd families on `/metrics`.

pub mod metrics;
