//! Deck building: listing pagination + per-track enrichment
//!
//! Pages are fetched one after another and every item is enriched in
//! listing order, so the deck order always equals the listing order no
//! matter which source resolved each year.
//!
//! Only the first page is essential. A failure there aborts the run before
//! any track is processed; a failure on a later page ends pagination and
//! keeps the tracks gathered so far.

use crate::listing::{ListingRef, ListingSource};
use crate::services::track_enricher::{EnrichedTrack, TrackEnricher};
use deckify_common::{Error, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Builds a deck from a catalog listing
pub struct DeckBuilder {
    listing_source: Arc<dyn ListingSource>,
    enricher: TrackEnricher,
}

impl DeckBuilder {
    pub fn new(listing_source: Arc<dyn ListingSource>, enricher: TrackEnricher) -> Self {
        Self {
            listing_source,
            enricher,
        }
    }

    /// Fetch every page of `listing` and enrich its tracks in order
    ///
    /// # Errors
    /// `Error::Listing` when the first page cannot be fetched.
    pub async fn build(&self, listing: &ListingRef) -> Result<Vec<EnrichedTrack>> {
        info!(listing = %listing, "Building deck");

        let mut page = self
            .listing_source
            .first_page(listing)
            .await
            .map_err(|e| Error::Listing(format!("Error fetching tracks for {}: {}", listing, e)))?;

        let mut deck = Vec::new();
        let mut seen = 0usize;
        let mut page_number = 1usize;

        loop {
            seen += page.items.len();
            for item in &page.items {
                if let Some(track) = self.enricher.enrich(item, listing).await {
                    deck.push(track);
                }
            }
            info!(page = page_number, tracks = deck.len(), "Listing page processed");

            let Some(next) = page.next.take() else {
                break;
            };

            page = match self.listing_source.next_page(&next).await {
                Ok(next_page) => next_page,
                Err(e) => {
                    warn!(error = %e, "Error fetching next set of tracks, keeping tracks gathered so far");
                    break;
                }
            };
            page_number += 1;
        }

        info!(
            listing = %listing,
            items = seen,
            tracks = deck.len(),
            dropped = seen - deck.len(),
            "Deck built"
        );

        Ok(deck)
    }
}
