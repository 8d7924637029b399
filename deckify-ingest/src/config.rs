//! Run configuration for deck building
//!
//! Resolves credentials and output settings once at start-up with
//! ENV → TOML priority. The resulting [`DeckConfig`] is passed by reference
//! to the wiring code; credentials are never logged.

use crate::sources::DEFAULT_USER_AGENT;
use deckify_common::config::{resolve_secret, TomlConfig};
use deckify_common::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

pub const SPOTIFY_CLIENT_ID_ENV: &str = "DECKIFY_SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "DECKIFY_SPOTIFY_CLIENT_SECRET";
pub const DISCOGS_TOKEN_ENV: &str = "DECKIFY_DISCOGS_TOKEN";

/// Output directory when neither CLI nor TOML names one
pub const DEFAULT_OUTPUT_DIR: &str = "deck";

/// Resolved configuration for one run
#[derive(Clone)]
pub struct DeckConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    /// `None` disables the Discogs stage
    pub discogs_token: Option<String>,
    pub musicbrainz_user_agent: String,
    pub output_dir: PathBuf,
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("spotify_client_id", &"<redacted>")
            .field("spotify_client_secret", &"<redacted>")
            .field("discogs_token", &self.discogs_token.as_ref().map(|_| "<redacted>"))
            .field("musicbrainz_user_agent", &self.musicbrainz_user_agent)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl DeckConfig {
    /// Resolve from environment and TOML
    ///
    /// # Errors
    /// `Error::Config` when either Spotify credential is missing.
    pub fn resolve(toml_config: &TomlConfig) -> Result<Self> {
        let spotify_client_id = resolve_secret(
            SPOTIFY_CLIENT_ID_ENV,
            toml_config.spotify.client_id.as_ref(),
            "Spotify client ID",
        )
        .ok_or_else(|| missing_spotify_credential("client ID", SPOTIFY_CLIENT_ID_ENV, "client_id"))?;

        let spotify_client_secret = resolve_secret(
            SPOTIFY_CLIENT_SECRET_ENV,
            toml_config.spotify.client_secret.as_ref(),
            "Spotify client secret",
        )
        .ok_or_else(|| {
            missing_spotify_credential("client secret", SPOTIFY_CLIENT_SECRET_ENV, "client_secret")
        })?;

        let discogs_token = resolve_secret(
            DISCOGS_TOKEN_ENV,
            toml_config.discogs.token.as_ref(),
            "Discogs token",
        );
        if discogs_token.is_none() {
            warn!(
                "Discogs token not configured ({} or [discogs] token). Discogs lookups disabled.",
                DISCOGS_TOKEN_ENV
            );
        }

        let musicbrainz_user_agent = toml_config
            .musicbrainz
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
            .to_string();

        let output_dir = toml_config
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            spotify_client_id,
            spotify_client_secret,
            discogs_token,
            musicbrainz_user_agent,
            output_dir,
        })
    }
}

fn missing_spotify_credential(what: &str, env_var: &str, toml_key: &str) -> Error {
    Error::Config(format!(
        "Spotify {} not configured. Please configure using one of:\n\
         1. Environment: {}=your-value\n\
         2. TOML config: [spotify] {} = \"your-value\"\n\
         \n\
         Create an app at: https://developer.spotify.com/dashboard",
        what, env_var, toml_key
    ))
}
