//! pushgate core: record model, naming rules and exposition primitives.
//!
//! This crate turns collectd value lists into Prometheus metric families. It
//! carries no transport or runtime dependencies so the same rules can back
//! the HTTP gateway, tests, and offline tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed push must surface as a `RejectReason` or `PushgateError`,
//! never as a crashed bridge.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod naming;
pub mod protocol;
pub mod record;

/// Shared result type.
pub use error::{Result, PushgateError};
pub use exposition::{MetricFamily, MetricKind, Sample};
pub use record::{DsType, MeasurementIdentity, MeasurementRecord, RejectReason};
