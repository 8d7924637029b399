//! Per-track enrichment
//!
//! raw listing item → [`TrackIdentity`] → release year → scannable code.
//! Items whose identity cannot be extracted are dropped without surfacing an
//! error, as are items whose code cannot be generated; no partial record is
//! ever emitted.

use crate::listing::ListingRef;
use crate::services::release_year_resolver::ReleaseYearResolver;
use crate::services::scan_code::{CodeGenerator, ScanCode};
use crate::types::{ReleaseYear, TrackIdentity, TrackQuery};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// A deck record: identity, resolved year and scannable code
#[derive(Debug, Clone)]
pub struct EnrichedTrack {
    pub identity: TrackIdentity,
    pub year: ReleaseYear,
    pub code: ScanCode,
}

impl EnrichedTrack {
    /// Artist for display; empty when the catalog credited nobody
    pub fn artist(&self) -> &str {
        self.identity.artist.as_deref().unwrap_or("")
    }

    pub fn title(&self) -> &str {
        &self.identity.title
    }

    pub fn url(&self) -> &str {
        &self.identity.url
    }
}

/// Enriches raw listing items one at a time
pub struct TrackEnricher {
    resolver: Arc<ReleaseYearResolver>,
    codes: Arc<dyn CodeGenerator>,
}

impl TrackEnricher {
    pub fn new(resolver: Arc<ReleaseYearResolver>, codes: Arc<dyn CodeGenerator>) -> Self {
        Self { resolver, codes }
    }

    /// Enrich one raw item of `listing`
    ///
    /// Returns `None` when the item has to be dropped.
    pub async fn enrich(&self, item: &Value, listing: &ListingRef) -> Option<EnrichedTrack> {
        let identity = listing.extract_identity(item)?;

        let year = match TrackQuery::from_identity(&identity) {
            Some(query) => self.resolver.resolve(&query).await,
            None => {
                debug!(track_id = %identity.track_id, "No artist credited, skipping year resolution");
                ReleaseYear::Unknown
            }
        };

        let code = match self.codes.generate(&identity.url) {
            Ok(code) => code,
            Err(e) => {
                warn!(track_id = %identity.track_id, error = %e, "Dropping track, code generation failed");
                return None;
            }
        };

        Some(EnrichedTrack { identity, year, code })
    }
}
