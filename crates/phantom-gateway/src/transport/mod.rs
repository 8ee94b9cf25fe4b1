//! Transport layer (HTTP).
//!
//! Exposes the ingest route handler and the body codec that expands and
//! decodes submissions once before they are counted.

pub mod codec;
pub mod http;
