//! Metadata and catalog sources
//!
//! Each release-year source implements [`YearSource`](crate::types::YearSource)
//! and is queried by the resolver in priority order:
//! 1. **discogs_client** - Discogs database search (master releases)
//! 2. **musicbrainz_client** - MusicBrainz recording search
//! 3. **spotify_album** - the originating catalog's album release date
//!
//! **spotify_client** is the catalog itself: token exchange, paginated
//! listings and album lookups.
//!
//! All HTTP failures surface as [`SourceError`] at this boundary.

pub mod discogs_client;
pub mod musicbrainz_client;
pub mod spotify_album;
pub mod spotify_client;

use crate::types::SourceError;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::time::Duration;

/// Default User-Agent for outgoing requests
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Deckify/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/deckify/deckify)"
);

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Direct (unkeyed) rate limiter shared by a client's requests
pub type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter allowing `per_second` requests per second
pub fn rate_limiter(per_second: NonZeroU32) -> DirectRateLimiter {
    RateLimiter::direct(Quota::per_second(per_second))
}

/// Build the HTTP client used by a source
pub fn build_http_client(user_agent: &str) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| SourceError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Check status and decode a JSON body
pub async fn decode_json<T: DeserializeOwned>(response: Response, provider: &str) -> Result<T, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Api(format!(
            "{} returned error {}: {}",
            provider, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| SourceError::Parse(format!("Failed to parse {} response: {}", provider, e)))
}

/// Map a transport failure
pub fn network_error(provider: &str, err: reqwest::Error) -> SourceError {
    SourceError::Network(format!("{} request failed: {}", provider, err))
}
