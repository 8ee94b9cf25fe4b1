//! Metric submission ingest.
//!
//! Order inside one request is fixed: read body, resolve origin, branch on
//! the debug flag, then expand/decode/log, and only then count. A failure at
//! any step leaves every counter untouched.

pub mod handler;

pub use handler::{Accepted, IngestHandler, IngestSettings};
