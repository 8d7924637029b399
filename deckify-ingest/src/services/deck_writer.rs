//! Deck persistence
//!
//! Writes one `<base>-<index>.svg` code image per record plus a `deck.json`
//! manifest listing the records in deck order. Card rendering reads the
//! manifest and lays out one card per entry.

use crate::services::track_enricher::EnrichedTrack;
use crate::types::ReleaseYear;
use deckify_common::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Manifest file name inside the output directory
pub const MANIFEST_FILE: &str = "deck.json";

/// One manifest entry
#[derive(Debug, Serialize)]
pub struct DeckEntry<'a> {
    pub artist: &'a str,
    pub title: &'a str,
    pub year: ReleaseYear,
    pub url: &'a str,
    /// Code image file name, relative to the manifest
    pub code: String,
}

/// Write the deck into `dir` and return the manifest path
///
/// # Errors
/// `Error::InvalidInput` when `base_name` is empty or is not a plain file
/// name (path separators, `.` or `..`); nothing is written in that case.
pub fn write_deck(dir: &Path, base_name: &str, tracks: &[EnrichedTrack]) -> Result<PathBuf> {
    validate_base_name(base_name)?;
    fs::create_dir_all(dir)?;

    let mut entries = Vec::with_capacity(tracks.len());
    for (index, track) in tracks.iter().enumerate() {
        let code_file = format!("{}-{}.svg", base_name, index);
        fs::write(dir.join(&code_file), &track.code.svg)?;

        entries.push(DeckEntry {
            artist: track.artist(),
            title: track.title(),
            year: track.year,
            url: track.url(),
            code: code_file,
        });
    }

    let manifest = serde_json::to_string_pretty(&entries)
        .map_err(|e| Error::Internal(format!("Failed to serialize deck manifest: {}", e)))?;
    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest)?;

    info!(
        path = %manifest_path.display(),
        cards = entries.len(),
        "Deck written"
    );

    Ok(manifest_path)
}

/// Code images must land inside the output directory
fn validate_base_name(base_name: &str) -> Result<()> {
    let plain = !base_name.trim().is_empty()
        && base_name != "."
        && base_name != ".."
        && !base_name.contains(['/', '\\']);

    if plain {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Deck name {:?} must be a plain file name",
            base_name
        )))
    }
}
