//! phantom gateway library entry.
//!
//! Wires config, counters, debug control, and the ingest handler into an
//! axum application. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod control;
pub mod ingest;
pub mod obs;
pub mod ops;
pub mod router;
pub mod transport;
