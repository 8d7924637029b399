//! Discogs Client (priority 1)
//!
//! Searches the Discogs database for master releases matching an artist and
//! a normalized track title. Every result that carries a year becomes a
//! candidate; results without one are skipped.
//!
//! # API Reference
//! - Endpoint: https://api.discogs.com/database/search
//! - Auth: `Authorization: Discogs token=<personal access token>`
//! - Rate Limit: 60 requests/minute for authenticated clients

use super::{build_http_client, decode_json, network_error, rate_limiter, DirectRateLimiter};
use crate::types::{CandidateDate, SourceError, TrackQuery, YearSource};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::debug;

/// Discogs API base URL
const DISCOGS_API_URL: &str = "https://api.discogs.com";

/// Discogs Client
pub struct DiscogsClient {
    http_client: Client,
    token: String,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl DiscogsClient {
    /// Create a client authenticated with a personal access token
    pub fn new(token: impl Into<String>, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            http_client: build_http_client(user_agent)?,
            token: token.into(),
            base_url: DISCOGS_API_URL.to_string(),
            // Authenticated quota is 60/min
            rate_limiter: rate_limiter(NonZeroU32::MIN),
        })
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, query: &TrackQuery) -> Result<DiscogsSearchResponse, SourceError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/database/search", self.base_url);
        debug!(
            artist = %query.artist,
            track = %query.search_title,
            "Querying Discogs database search"
        );

        let response = self
            .http_client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Discogs token={}", self.token))
            .query(&[
                ("artist", query.artist.as_str()),
                ("track", query.search_title.as_str()),
                ("type", "master"),
            ])
            .send()
            .await
            .map_err(|e| network_error("Discogs", e))?;

        decode_json(response, "Discogs").await
    }
}

#[async_trait]
impl YearSource for DiscogsClient {
    fn name(&self) -> &'static str {
        "Discogs"
    }

    async fn fetch(&self, query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
        let response = self.search(query).await?;
        let candidates = candidates_from_search(response);

        debug!(
            artist = %query.artist,
            track = %query.search_title,
            count = candidates.len(),
            "Discogs search complete"
        );

        Ok(candidates)
    }
}

/// Candidates from a search response: one per result carrying a year
pub fn candidates_from_search(response: DiscogsSearchResponse) -> Vec<CandidateDate> {
    response
        .results
        .into_iter()
        .filter_map(|result| result.year.and_then(YearField::into_text))
        .map(|year| CandidateDate::new(year, None))
        .collect()
}

// ============================================================================
// Discogs API Response Types
// ============================================================================

/// Database search response
#[derive(Debug, Default, Deserialize)]
pub struct DiscogsSearchResponse {
    #[serde(default)]
    pub results: Vec<DiscogsSearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct DiscogsSearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<YearField>,
}

/// Discogs reports `year` as a string on search results, a number elsewhere
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Text(String),
    Number(i64),
}

impl YearField {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) if !text.trim().is_empty() => Some(text),
            Self::Text(_) => None,
            Self::Number(n) => Some(n.to_string()),
        }
    }
}
