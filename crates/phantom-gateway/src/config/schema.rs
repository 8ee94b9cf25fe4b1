use std::net::SocketAddr;

use axum::http::HeaderName;
use clap::ValueEnum;
use serde::Deserialize;
use phantom_core::error::{PhantomError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhantomConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,
}

impl Default for PhantomConfig {
    fn default() -> Self {
        Self { version: 1, server: ServerSection::default() }
    }
}

impl PhantomConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PhantomError::UnsupportedVersion);
        }

        self.server.validate()?;

        Ok(())
    }
}

/// Base labels attached to every increment of the posts counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LabelSet {
    #[value(name = "origin")]
    Origin,
    #[value(name = "origin_proxies")]
    OriginProxies,
}

/// How a decoded batch is counted in debug mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// One increment per record, labelled with its path.
    #[value(name = "per_path")]
    PerPath,
    /// One increment per request.
    #[value(name = "per_request")]
    PerRequest,
}

/// Body of a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    #[value(name = "empty")]
    Empty,
    /// Fixed bulk-index style acknowledgment document.
    #[value(name = "bulk_ack")]
    BulkAck,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_BODY_BYTES_CEILING: usize = 1 << 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Header carrying the forwarding chain.
    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial debug state; SIGUSR1 flips it at runtime.
    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_labels")]
    pub labels: LabelSet,

    #[serde(default = "default_count_mode")]
    pub count_mode: CountMode,

    #[serde(default = "default_response")]
    pub response: ResponseMode,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            header: default_header(),
            log_level: default_log_level(),
            debug: false,
            labels: default_labels(),
            count_mode: default_count_mode(),
            response: default_response(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        self.header_name()?;
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(PhantomError::Config(format!(
                "server.log_level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !(1..=MAX_BODY_BYTES_CEILING).contains(&self.max_body_bytes) {
            return Err(PhantomError::Config(format!(
                "server.max_body_bytes must be between 1 and {MAX_BODY_BYTES_CEILING}"
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| PhantomError::Config(format!("server.listen {:?}: {e}", self.listen)))
    }

    pub fn header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.header.as_bytes())
            .map_err(|e| PhantomError::Config(format!("server.header {:?}: {e}", self.header)))
    }
}

fn default_listen() -> String {
    "0.0.0.0:7777".into()
}
fn default_header() -> String {
    "X-Forwarded-For".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_labels() -> LabelSet {
    LabelSet::OriginProxies
}
fn default_count_mode() -> CountMode {
    CountMode::PerPath
}
fn default_response() -> ResponseMode {
    ResponseMode::Empty
}
fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}
