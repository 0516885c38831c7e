//! pushgate gateway library entry.
//!
//! This crate wires the push transport, the measurement store, the render
//! engine and the operational endpoints into an axum service. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod render;
pub mod router;
pub mod store;
pub mod transport;
