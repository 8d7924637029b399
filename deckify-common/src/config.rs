//! Configuration loading
//!
//! Configuration is read once at start-up from a TOML file and the process
//! environment, then handed to the ingest pipeline as an explicit value.
//!
//! Config file location priority:
//! 1. Command-line argument (highest priority)
//! 2. `DECKIFY_CONFIG` environment variable
//! 3. `<platform config dir>/deckify/config.toml`
//!
//! A missing config file is not an error: a warning is logged and defaults
//! are used. Credentials resolve environment first, then TOML.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DECKIFY_CONFIG";

/// Contents of `config.toml`
///
/// ```toml
/// output_dir = "cards"
///
/// [logging]
/// level = "debug"
///
/// [spotify]
/// client_id = "..."
/// client_secret = "..."
///
/// [discogs]
/// token = "..."
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory the deck is written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub discogs: DiscogsConfig,
    #[serde(default)]
    pub musicbrainz: MusicBrainzConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `[spotify]` table (client-credentials flow)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// `[discogs]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscogsConfig {
    /// Personal access token from https://www.discogs.com/settings/developers
    pub token: Option<String>,
}

/// `[musicbrainz]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicBrainzConfig {
    /// Overrides the default User-Agent (MusicBrainz asks for contact info)
    pub user_agent: Option<String>,
}

/// Default config file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deckify").join("config.toml"))
}

/// Pick the config file to read
pub fn locate_config_file(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file if present, defaults otherwise
///
/// Only a file that exists but cannot be read or parsed is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) if path.exists() => {
            let config = load_toml_config(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using defaults and environment",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("No config directory available, using defaults and environment");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve a credential from environment, then TOML
///
/// Blank values count as unset. When both sources carry a value the
/// environment wins and a warning is logged.
pub fn resolve_secret(env_var: &str, toml_value: Option<&String>, label: &str) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v)).cloned();

    match (env_value, toml_value) {
        (Some(env), Some(_)) => {
            warn!(
                "{} found in both {} and TOML config. Using environment (highest priority).",
                label, env_var
            );
            Some(env)
        }
        (Some(env), None) => {
            info!("{} loaded from environment variable", label);
            Some(env)
        }
        (None, Some(toml)) => {
            info!("{} loaded from TOML config", label);
            Some(toml)
        }
        (None, None) => None,
    }
}

/// Validate a credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_default_logging_level() {
        assert_eq!(LoggingConfig::default().level, "info");
        assert_eq!(TomlConfig::default().logging.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: TomlConfig = toml::from_str(
            r#"
            [discogs]
            token = "tok"
            "#,
        )
        .unwrap();

        assert_eq!(config.discogs.token.as_deref(), Some("tok"));
        assert!(config.spotify.client_id.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_locate_prefers_cli_argument() {
        let path = PathBuf::from("/tmp/explicit.toml");
        assert_eq!(locate_config_file(Some(&path)), Some(path));
    }
}
