//! Spotify Web API client
//!
//! The originating catalog. Supplies paginated album/playlist listings and
//! album release dates. Authenticates with the client-credentials flow; the
//! access token is reused until shortly before it expires.
//!
//! # API Reference
//! - Token: POST https://accounts.spotify.com/api/token
//! - Album tracks: GET /v1/albums/{id}/tracks
//! - Playlist tracks: GET /v1/playlists/{id}/tracks
//! - Album: GET /v1/albums/{id}

use super::{build_http_client, decode_json, network_error};
use super::spotify_album::AlbumCatalog;
use crate::listing::{ListingKind, ListingPage, ListingRef, ListingSource};
use crate::types::SourceError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Items requested per listing page
pub const PAGE_LIMIT: u32 = 50;

/// Refresh the token this long before Spotify says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    api_url: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl SpotifyClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            http_client: build_http_client(user_agent)?,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: SPOTIFY_API_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            token: Mutex::new(None),
        })
    }

    /// Point the client at different API and token endpoints
    pub fn with_endpoints(mut self, api_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Current access token, fetching a new one when missing or expiring
    async fn access_token(&self) -> Result<String, SourceError> {
        let mut slot = self.token.lock().await;

        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        debug!("Requesting Spotify access token");
        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| network_error("Spotify token", e))?;

        let token: TokenResponse = decode_json(response, "Spotify token").await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);

        *slot = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, SourceError> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| network_error("Spotify", e))?;

        decode_json(response, "Spotify").await
    }

    fn listing_url(&self, listing: &ListingRef) -> String {
        match listing.kind {
            ListingKind::Album => format!("{}/albums/{}/tracks", self.api_url, listing.id),
            ListingKind::Playlist => format!("{}/playlists/{}/tracks", self.api_url, listing.id),
        }
    }
}

#[async_trait]
impl ListingSource for SpotifyClient {
    async fn first_page(&self, listing: &ListingRef) -> Result<ListingPage, SourceError> {
        debug!(listing = %listing, "Fetching first listing page");
        let url = self.listing_url(listing);
        self.get_json(&url, &[("limit", PAGE_LIMIT.to_string())]).await
    }

    async fn next_page(&self, next: &str) -> Result<ListingPage, SourceError> {
        debug!(next = %next, "Fetching next listing page");
        // `next` already carries offset and limit
        self.get_json(next, &[]).await
    }
}

#[async_trait]
impl AlbumCatalog for SpotifyClient {
    async fn album_release_date(&self, album_id: &str) -> Result<Option<String>, SourceError> {
        let url = format!("{}/albums/{}", self.api_url, album_id);
        let album: AlbumResponse = self.get_json(&url, &[]).await?;
        Ok(album.release_date)
    }
}

// ============================================================================
// Spotify API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    #[serde(default)]
    release_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SpotifyClient {
        SpotifyClient::new("id", "secret", "test-agent")
            .unwrap()
            .with_endpoints("http://localhost:9/v1", "http://localhost:9/token")
    }

    #[test]
    fn test_listing_urls() {
        let client = client();
        let album = ListingRef { kind: ListingKind::Album, id: "a1".to_string() };
        let playlist = ListingRef { kind: ListingKind::Playlist, id: "p1".to_string() };

        assert_eq!(client.listing_url(&album), "http://localhost:9/v1/albums/a1/tracks");
        assert_eq!(client.listing_url(&playlist), "http://localhost:9/v1/playlists/p1/tracks");
    }

    #[test]
    fn test_token_response_defaults_expiry() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "Bearer"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_album_response_release_date() {
        let album: AlbumResponse =
            serde_json::from_str(r#"{"id": "a1", "release_date": "1997-05-21", "release_date_precision": "day"}"#)
                .unwrap();
        assert_eq!(album.release_date.as_deref(), Some("1997-05-21"));

        let album: AlbumResponse = serde_json::from_str(r#"{"id": "a1"}"#).unwrap();
        assert!(album.release_date.is_none());
    }

    #[tokio::test]
    async fn test_cached_token_reused() {
        let client = client();
        *client.token.lock().await = Some(CachedToken {
            access_token: "cached".to_string(),
            expires_at: Instant::now() + Duration::from_secs(600),
        });

        // Endpoint is unreachable, so success proves no request was made
        assert_eq!(client.access_token().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_expired_token_refetched() {
        let client = client();
        *client.token.lock().await = Some(CachedToken {
            access_token: "stale".to_string(),
            expires_at: Instant::now(),
        });

        // Refetch goes to the unreachable endpoint instead of returning "stale"
        assert!(client.access_token().await.is_err());
    }
}
