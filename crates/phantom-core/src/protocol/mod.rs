//! Request-level protocol pieces.
//!
//! - `origin`: forwarding header chain (`ip1, ip2, ...`)
//! - `record`: Graphite-style metric record inside a submitted batch

pub mod origin;
pub mod record;
