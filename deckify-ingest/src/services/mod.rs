//! Deck-building services
//!
//! - **release_year_resolver** - priority cascade over year sources
//! - **track_enricher** - raw item → enriched record
//! - **deck_builder** - listing pagination driving the enricher
//! - **deck_writer** - manifest and code image persistence
//! - **scan_code** - scannable code generation

pub mod deck_builder;
pub mod deck_writer;
pub mod release_year_resolver;
pub mod scan_code;
pub mod track_enricher;

pub use deck_builder::DeckBuilder;
pub use deck_writer::write_deck;
pub use release_year_resolver::{ReleaseYearResolver, Resolution};
pub use scan_code::{CodeGenerator, QrSvgGenerator, ScanCode};
pub use track_enricher::{EnrichedTrack, TrackEnricher};
