//! Configuration file loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use datahub_model::DatahubConfig;

/// Load the run configuration.
///
/// Without a path every setting takes its default. A path that cannot be read
/// or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<DatahubConfig> {
    let Some(path) = path else {
        tracing::debug!("no config file given, using defaults");
        return Ok(DatahubConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: DatahubConfig =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), root = %config.storage.root.display(), "config loaded");
    Ok(config)
}
