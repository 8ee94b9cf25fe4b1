//! Command-line flags. Every flag can also come from a `PHANTOM_*` env var;
//! flags that are given override the config file.

use clap::Parser;

use phantom_core::error::Result;

use super::schema::{CountMode, LabelSet, PhantomConfig, ResponseMode};

/// Counts metric submissions by forwarding origin.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "phantom")]
#[command(version)]
pub struct Args {
    /// YAML config file; flags below override its values
    #[arg(long, env = "PHANTOM_CONFIG")]
    pub config: Option<String>,

    /// ip:port for listening to web requests [default: 0.0.0.0:7777]
    #[arg(long, env = "PHANTOM_LISTEN")]
    pub listen: Option<String>,

    /// Request address header [default: X-Forwarded-For]
    #[arg(long, env = "PHANTOM_HEADER")]
    pub header: Option<String>,

    /// trace, debug, info, warn, error [default: info]
    #[arg(long = "log-level", env = "PHANTOM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Decode bodies and count per metric path
    #[arg(long, env = "PHANTOM_DEBUG", num_args = 0..=1, default_missing_value = "true")]
    pub debug: Option<bool>,

    /// Base counter labels [default: origin_proxies]
    #[arg(long, value_enum, env = "PHANTOM_LABELS")]
    pub labels: Option<LabelSet>,

    /// Debug-mode counting [default: per_path]
    #[arg(long = "count-mode", value_enum, env = "PHANTOM_COUNT_MODE")]
    pub count_mode: Option<CountMode>,

    /// Success body [default: empty]
    #[arg(long, value_enum, env = "PHANTOM_RESPONSE")]
    pub response: Option<ResponseMode>,

    /// Raw and decompressed body limit [default: 16777216]
    #[arg(long = "max-body-bytes", env = "PHANTOM_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,
}

impl Args {
    /// Resolve the effective config: file (or defaults), then flag overrides.
    pub fn into_config(self) -> Result<PhantomConfig> {
        let mut cfg = match &self.config {
            Some(path) => super::load_from_file(path)?,
            None => PhantomConfig::default(),
        };
        self.apply(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply(self, cfg: &mut PhantomConfig) {
        let s = &mut cfg.server;
        if let Some(v) = self.listen { s.listen = v; }
        if let Some(v) = self.header { s.header = v; }
        if let Some(v) = self.log_level { s.log_level = v; }
        if let Some(v) = self.debug { s.debug = v; }
        if let Some(v) = self.labels { s.labels = v; }
        if let Some(v) = self.count_mode { s.count_mode = v; }
        if let Some(v) = self.response { s.response = v; }
        if let Some(v) = self.max_body_bytes { s.max_body_bytes = v; }
    }
}
