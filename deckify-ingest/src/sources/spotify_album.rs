//! Originating-catalog album date (priority 3, last resort)
//!
//! Looks up the album the track came from and takes the year component of
//! its release date verbatim. No compilation filtering: the catalog's own
//! album date is assumed to be internally consistent.

use crate::types::{CandidateDate, SourceError, TrackQuery, YearSource};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Catalog that can report an album's release date
#[async_trait]
pub trait AlbumCatalog: Send + Sync {
    /// Release date text as the catalog stores it (`1997`, `1997-05`,
    /// `1997-05-21`); `None` when the album has no date
    async fn album_release_date(&self, album_id: &str) -> Result<Option<String>, SourceError>;
}

/// Year source backed by the catalog's album date
pub struct AlbumDateSource {
    catalog: Arc<dyn AlbumCatalog>,
}

impl AlbumDateSource {
    pub fn new(catalog: Arc<dyn AlbumCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl YearSource for AlbumDateSource {
    fn name(&self) -> &'static str {
        "Spotify album"
    }

    async fn fetch(&self, query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
        let album_id = query
            .album_id
            .as_deref()
            .ok_or_else(|| SourceError::NotAvailable("track has no album id".to_string()))?;

        let release_date = self.catalog.album_release_date(album_id).await?;
        debug!(album_id = %album_id, release_date = ?release_date, "Album release date fetched");

        Ok(release_date
            .map(|date| vec![CandidateDate::new(year_component(&date), None)])
            .unwrap_or_default())
    }
}

/// Text before the first `-`
pub fn year_component(release_date: &str) -> &str {
    release_date.split('-').next().unwrap_or(release_date)
}
