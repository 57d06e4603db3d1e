mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;
    validate_config(&config)?;
    Ok(config)
}

/// Config files tried, in order, when none is given on the command line.
const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "./config.toml",
    "./tonearm.toml",
    "~/.config/tonearm/config.toml",
    "/etc/tonearm/config.toml",
];

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    load_config_with_path(custom_path).map(|(config, _)| config)
}

/// Like [`load_config_or_default`], but also returns the file that was read.
pub fn load_config_with_path(custom_path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = custom_path {
        return Ok((load_config(path)?, Some(path.to_path_buf())));
    }

    match find_config(&DEFAULT_CONFIG_PATHS) {
        Some(path) => {
            tracing::debug!("Using config file {:?}", path);
            Ok((load_config(&path)?, Some(path)))
        }
        None => Ok((Config::default(), None)),
    }
}

/// First existing file among `candidates`, after `~` expansion.
fn find_config(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|path_str| PathBuf::from(shellexpand::tilde(path_str).as_ref()))
        .find(|path| path.exists())
}

/// Resolve where the SQLite database lives.
///
/// An explicit `storage.database` wins; otherwise `tonearm.db` is placed next
/// to the config file, or in the current directory.
pub fn database_path(config: &Config, config_path: Option<&Path>) -> PathBuf {
    if let Some(ref db) = config.storage.database {
        return db.clone();
    }

    let data_dir = config_path
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    data_dir.join("tonearm.db")
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let auth = &config.server.auth;
    if auth.enabled && auth.api_key.as_deref().map_or(true, str::is_empty) {
        anyhow::bail!("Authentication is enabled but no api_key is set");
    }

    let chunk_size = config.streaming.chunk_size;
    if chunk_size == 0 {
        anyhow::bail!("streaming.chunk_size must be greater than 0");
    }
    if chunk_size > MAX_CHUNK_SIZE {
        anyhow::bail!(
            "streaming.chunk_size {} exceeds the maximum of {} bytes",
            chunk_size,
            MAX_CHUNK_SIZE
        );
    }

    if config.streaming.default_content_type.trim().is_empty() {
        anyhow::bail!("streaming.default_content_type cannot be empty");
    }

    Ok(())
}
