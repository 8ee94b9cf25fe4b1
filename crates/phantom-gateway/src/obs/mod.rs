//! Lightweight in-process metrics.
//!
//! Counters are stored as atomics behind `DashMap` and rendered in Prometheus
//! text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::{CounterSink, CounterVec, IngestMetrics};
