//! MusicBrainz Client (priority 2)
//!
//! Runs a Lucene recording search (`artist:<artist> AND recording:<title>`)
//! and reports the release dates of the first matching recording.
//!
//! Releases are dropped when they have no date, when the date is in no
//! supported format, or when they are credited to the "Various Artists"
//! compilation pseudo-artist. Survivors are returned earliest first.
//!
//! # API Reference
//! - Endpoint: https://musicbrainz.org/ws/2/recording?query=...&fmt=json
//! - Documentation: https://musicbrainz.org/doc/MusicBrainz_API/Search
//! - Rate Limit: 1 request/second (as per MusicBrainz Terms of Service)

use super::{build_http_client, decode_json, network_error, rate_limiter, DirectRateLimiter};
use crate::types::{CandidateDate, SourceError, TrackQuery, YearSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::debug;

/// MusicBrainz API base URL
const MUSICBRAINZ_API_URL: &str = "https://musicbrainz.org/ws/2";

/// Artist credit MusicBrainz uses for multi-artist compilations
pub const COMPILATION_ARTIST: &str = "Various Artists";

/// MusicBrainz Client
///
/// Rate limited to 1 request/second. MusicBrainz requires a meaningful
/// User-Agent; pass one with contact details where possible.
pub struct MusicBrainzClient {
    http_client: Client,
    base_url: String,
    rate_limiter: DirectRateLimiter,
}

impl MusicBrainzClient {
    pub fn new(user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            http_client: build_http_client(user_agent)?,
            base_url: MUSICBRAINZ_API_URL.to_string(),
            rate_limiter: rate_limiter(NonZeroU32::MIN),
        })
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search_recordings(&self, query: &TrackQuery) -> Result<RecordingSearchResponse, SourceError> {
        self.rate_limiter.until_ready().await;

        let lucene = search_query(query);
        debug!(query = %lucene, "Querying MusicBrainz recording search");

        let response = self
            .http_client
            .get(format!("{}/recording", self.base_url))
            .query(&[("query", lucene.as_str()), ("fmt", "json")])
            .send()
            .await
            .map_err(|e| network_error("MusicBrainz", e))?;

        decode_json(response, "MusicBrainz").await
    }
}

#[async_trait]
impl YearSource for MusicBrainzClient {
    fn name(&self) -> &'static str {
        "MusicBrainz"
    }

    async fn fetch(&self, query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
        let response = self.search_recordings(query).await?;
        let candidates = candidates_from_recordings(response);

        debug!(
            artist = %query.artist,
            recording = %query.search_title,
            count = candidates.len(),
            earliest = ?candidates.first().map(|c| &c.raw_date),
            "MusicBrainz search complete"
        );

        Ok(candidates)
    }
}

/// Lucene query for a recording search
pub fn search_query(query: &TrackQuery) -> String {
    format!("artist:{} AND recording:{}", query.artist, query.search_title)
}

/// Dated, non-compilation releases of the first recording, earliest first
pub fn candidates_from_recordings(response: RecordingSearchResponse) -> Vec<CandidateDate> {
    let Some(recording) = response.recordings.into_iter().next() else {
        return Vec::new();
    };

    let mut candidates: Vec<CandidateDate> = recording
        .releases
        .into_iter()
        .filter_map(|release| {
            let date = release.date?;
            let credit = release
                .artist_credit
                .into_iter()
                .next()
                .map(|credit| credit.artist.name);
            Some(CandidateDate::new(date, credit))
        })
        .filter(|candidate| candidate.parsed.is_some())
        .filter(|candidate| candidate.artist_credit.as_deref() != Some(COMPILATION_ARTIST))
        .collect();

    candidates.sort_by_key(|candidate| candidate.parsed);
    candidates
}

// ============================================================================
// MusicBrainz API Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RecordingSearchResponse {
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

#[derive(Debug, Deserialize)]
pub struct Recording {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

#[derive(Debug, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Vec<ArtistCredit>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistCredit {
    pub artist: Artist,
}

#[derive(Debug, Deserialize)]
pub struct Artist {
    pub name: String,
}
