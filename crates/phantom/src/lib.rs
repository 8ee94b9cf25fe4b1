//! Top-level facade crate for phantom.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use phantom_core::*;
}

pub mod gateway {
    pub use phantom_gateway::*;
}
