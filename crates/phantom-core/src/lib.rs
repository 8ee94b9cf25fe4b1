//! phantom core: transport-agnostic primitives shared by the gateway.
//!
//! Holds the error surface, forwarding-chain decomposition, and the metric
//! record wire type. It carries no HTTP or runtime dependencies.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here so malformed
//! traffic can only ever surface as `PhantomError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{PhantomError, Result};
pub use protocol::origin::{decompose_origin_chain, OriginChain, UNKNOWN_ORIGIN};
pub use protocol::record::MetricRecord;
