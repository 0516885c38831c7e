//! Wire formats accepted on the push endpoint.
//!
//! Only collectd's `write_http` JSON format is supported. Decoding is
//! panic-free and per-record: one bad value list never takes the rest of
//! the batch down with it.

pub mod value_list;

pub use value_list::{decode_batch, DecodedBatch, ValueList};
