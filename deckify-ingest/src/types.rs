//! Core types and trait definitions for deckify-ingest
//!
//! - [`TrackIdentity`]: identity fields extracted from one catalog item
//! - [`TrackQuery`]: what the metadata sources are asked about
//! - [`CandidateDate`]: one source's proposed release date
//! - [`ReleaseYear`]: the resolved year or the "unknown" sentinel
//! - [`YearSource`]: the adapter trait every metadata source implements

use crate::normalize::normalize_title;
use async_trait::async_trait;
use deckify_common::ReleaseDate;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Rendering of [`ReleaseYear::Unknown`]
pub const UNKNOWN_YEAR: &str = "N/A";

// ============================================================================
// Track identity
// ============================================================================

/// Identity fields of a catalog track
///
/// Immutable once extracted. `artist` is the first credited artist and may be
/// absent; in that case year resolution is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIdentity {
    /// Catalog track ID
    pub track_id: String,
    /// First listed artist
    pub artist: Option<String>,
    /// Title exactly as received from the catalog
    pub title: String,
    /// Album the track belongs to, used by the last-resort source
    pub album_id: Option<String>,
    /// Playable link encoded into the scannable code
    pub url: String,
}

/// Query handed to each metadata source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    pub artist: String,
    /// Raw title
    pub title: String,
    /// Normalized title used as the search key
    pub search_title: String,
    pub album_id: Option<String>,
}

impl TrackQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, album_id: Option<String>) -> Self {
        let title = title.into();
        Self {
            artist: artist.into(),
            search_title: normalize_title(&title),
            title,
            album_id,
        }
    }

    /// Build a query from an identity; `None` when no artist is credited
    pub fn from_identity(identity: &TrackIdentity) -> Option<Self> {
        identity
            .artist
            .as_ref()
            .map(|artist| Self::new(artist.clone(), identity.title.clone(), identity.album_id.clone()))
    }
}

// ============================================================================
// Candidate dates and resolved years
// ============================================================================

/// One release date proposed by a metadata source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDate {
    /// Date text as reported by the source
    pub raw_date: String,
    /// `None` when the text matches no supported format
    pub parsed: Option<ReleaseDate>,
    /// Artist the release is credited to, when the source reports it
    pub artist_credit: Option<String>,
}

impl CandidateDate {
    pub fn new(raw_date: impl Into<String>, artist_credit: Option<String>) -> Self {
        let raw_date = raw_date.into();
        Self {
            parsed: ReleaseDate::parse(&raw_date),
            raw_date,
            artist_credit,
        }
    }
}

/// Resolved release year of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseYear {
    Known(i32),
    Unknown,
}

impl ReleaseYear {
    pub fn from_date(date: &ReleaseDate) -> Self {
        Self::Known(date.year())
    }

    /// Earliest parseable candidate, as a year
    pub fn earliest(candidates: &[CandidateDate]) -> Option<Self> {
        candidates
            .iter()
            .filter_map(|c| c.parsed)
            .min()
            .map(|date| Self::from_date(&date))
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(year) => write!(f, "{:04}", year),
            Self::Unknown => f.write_str(UNKNOWN_YEAR),
        }
    }
}

impl Serialize for ReleaseYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Metadata source trait
// ============================================================================

/// A metadata source that proposes release dates for a track
///
/// Implementations are stateless fetchers: they never decide which
/// candidate wins, they only report what the provider returned (minus
/// provider-specific noise such as compilation releases).
///
/// # Example
/// ```rust,ignore
/// pub struct FixedSource;
///
/// #[async_trait::async_trait]
/// impl YearSource for FixedSource {
///     fn name(&self) -> &'static str { "Fixed" }
///
///     async fn fetch(&self, _query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
///         Ok(vec![CandidateDate::new("1998", None)])
///     }
/// }
/// ```
#[async_trait]
pub trait YearSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Fetch candidate release dates for the query
    ///
    /// # Errors
    /// Returns `SourceError` if the provider could not be queried; the
    /// resolver treats that as "no candidates" and moves on.
    async fn fetch(&self, query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError>;
}

/// Failure at a metadata or catalog source boundary
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request could not be sent or no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source cannot answer this query (missing input or credentials)
    #[error("Not available: {0}")]
    NotAvailable(String),
}
