//! Transport layer (HTTP push).
//!
//! Exposes the collectd push handler. Decoding happens once, in
//! `pushgate_core::protocol`, before anything reaches the store.

pub mod push;
