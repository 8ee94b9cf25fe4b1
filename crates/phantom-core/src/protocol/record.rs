//! Graphite-style metric record.
//!
//! Only `path` is consumed. `value` and `timestamp` are kept as raw JSON so
//! any shape is accepted without interpretation.

use serde::Deserialize;
use serde_json::value::RawValue;

/// One entry of a submitted batch (`[{"path":..,"value":..,"timestamp":..}]`).
#[derive(Debug, Deserialize)]
pub struct MetricRecord {
    /// Dotted metric path. Missing decodes as empty.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub value: Option<Box<RawValue>>,
    #[serde(default)]
    pub timestamp: Option<Box<RawValue>>,
}

impl MetricRecord {
    /// Decode a whole batch. The top-level document must be an array.
    pub fn decode_batch(body: &[u8]) -> crate::Result<Vec<MetricRecord>> {
        serde_json::from_slice(body).map_err(|e| crate::PhantomError::Decode(e.to_string()))
    }
}
