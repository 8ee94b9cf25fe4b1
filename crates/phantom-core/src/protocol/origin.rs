//! Forwarding header chain decomposition.
//!
//! A forwarded-for style header carries `client, proxy1, proxy2, ...`. The
//! first token is the presumed client (the origin); everything after the
//! first comma is the relay chain, kept verbatim apart from edge spaces.

/// Origin reported when the chain is absent or carries no first address.
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// Decomposed forwarding chain. Borrows from the raw header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginChain<'a> {
    /// Never empty.
    pub origin: &'a str,
    /// Empty when the chain holds a single address.
    pub proxies: &'a str,
}

impl<'a> OriginChain<'a> {
    /// Parse an optional raw header value. `None` and `Some("")` are equivalent.
    pub fn parse(raw: Option<&'a str>) -> Self {
        let (origin, proxies) = decompose_origin_chain(raw.unwrap_or_default());
        Self { origin, proxies }
    }
}

/// Split `raw` into `(origin, proxies)`.
///
/// Only the first comma separates; separators inside the proxy chain are
/// preserved as sent.
pub fn decompose_origin_chain(raw: &str) -> (&str, &str) {
    let (first, rest) = match raw.split_once(',') {
        Some((first, rest)) => (first, rest.trim_matches(' ')),
        None => (raw, ""),
    };

    let origin = first.trim_matches(' ');
    if origin.is_empty() {
        return (UNKNOWN_ORIGIN, rest);
    }
    (origin, rest)
}
