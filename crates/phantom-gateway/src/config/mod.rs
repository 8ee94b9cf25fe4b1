//! Config loader (strict YAML file, then CLI/env overrides).

pub mod args;
pub mod schema;

use std::fs;

use phantom_core::error::{PhantomError, Result};

pub use args::Args;
pub use schema::{CountMode, LabelSet, PhantomConfig, ResponseMode, ServerSection};

pub fn load_from_file(path: &str) -> Result<PhantomConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PhantomError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PhantomConfig> {
    let cfg: PhantomConfig = serde_yaml::from_str(s)
        .map_err(|e| PhantomError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
