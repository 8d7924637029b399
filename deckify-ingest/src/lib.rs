//! deckify-ingest - deck building for the music-timeline card game
//!
//! Turns a catalog album or playlist into an ordered deck of records, each
//! carrying artist, title, earliest known release year and a scannable code
//! for the track's playable URL.
//!
//! Pipeline per track: identity extraction → title normalization →
//! release-year cascade (Discogs → MusicBrainz → catalog album date) →
//! code generation. Tracks are processed one at a time in listing order.

pub mod config;
pub mod listing;
pub mod normalize;
pub mod services;
pub mod sources;
pub mod types;

pub use crate::config::DeckConfig;
pub use crate::listing::{ListingKind, ListingPage, ListingRef, ListingSource};
pub use crate::normalize::normalize_title;
pub use crate::services::{
    write_deck, CodeGenerator, DeckBuilder, EnrichedTrack, QrSvgGenerator, ReleaseYearResolver,
    ScanCode, TrackEnricher,
};
pub use crate::types::{CandidateDate, ReleaseYear, SourceError, TrackIdentity, TrackQuery, YearSource};

use crate::sources::discogs_client::DiscogsClient;
use crate::sources::musicbrainz_client::MusicBrainzClient;
use crate::sources::spotify_album::AlbumDateSource;
use crate::sources::spotify_client::SpotifyClient;
use crate::sources::DEFAULT_USER_AGENT;
use deckify_common::{Error, Result};
use std::sync::Arc;
use tracing::info;

/// Wire the production deck builder from resolved configuration
///
/// Source priority: Discogs (only when a token is configured), MusicBrainz,
/// then the catalog's album date.
pub fn build_deck_builder(config: &DeckConfig) -> Result<DeckBuilder> {
    let spotify = Arc::new(
        SpotifyClient::new(
            &config.spotify_client_id,
            &config.spotify_client_secret,
            DEFAULT_USER_AGENT,
        )
        .map_err(client_setup_error)?,
    );

    let mut year_sources: Vec<Arc<dyn YearSource>> = Vec::new();
    if let Some(token) = &config.discogs_token {
        year_sources.push(Arc::new(
            DiscogsClient::new(token, DEFAULT_USER_AGENT).map_err(client_setup_error)?,
        ));
    }
    year_sources.push(Arc::new(
        MusicBrainzClient::new(&config.musicbrainz_user_agent).map_err(client_setup_error)?,
    ));
    year_sources.push(Arc::new(AlbumDateSource::new(spotify.clone())));

    let resolver = ReleaseYearResolver::new(year_sources);
    info!(sources = ?resolver.source_names(), "Release-year cascade configured");

    let enricher = TrackEnricher::new(Arc::new(resolver), Arc::new(QrSvgGenerator::default()));

    Ok(DeckBuilder::new(spotify, enricher))
}

fn client_setup_error(err: SourceError) -> Error {
    Error::Internal(format!("HTTP client setup failed: {}", err))
}
