//! Release-year resolution cascade
//!
//! Sources are tried in a fixed priority order and the first one that yields
//! a usable year wins; later sources are never contacted. Within a source the
//! earliest parseable date wins, so reissues and remasters never shadow the
//! original release. There is no re-sorting across sources.
//!
//! The resolver cannot fail: a source error is logged and treated as "no
//! candidates", and when every source comes up empty the answer is
//! [`ReleaseYear::Unknown`].

use crate::types::{ReleaseYear, TrackQuery, YearSource};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Run `attempt` over `items` in order, returning the first `Some`.
///
/// Items after the first success are never attempted.
pub async fn first_success<I, T, F, Fut>(items: I, mut attempt: F) -> Option<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for item in items {
        if let Some(found) = attempt(item).await {
            return Some(found);
        }
    }
    None
}

/// Outcome of one resolution, with the source that answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub year: ReleaseYear,
    /// `None` when no source produced a year
    pub source: Option<&'static str>,
}

/// Album id is part of the key: the catalog-album stage answers per album
type CacheKey = (String, String, Option<String>);

/// Resolves a track's original release year from prioritized sources
pub struct ReleaseYearResolver {
    /// Sources in priority order
    sources: Vec<Arc<dyn YearSource>>,
    /// Resolutions keyed by (artist, normalized title, album id)
    cache: Mutex<HashMap<CacheKey, Resolution>>,
}

impl ReleaseYearResolver {
    pub fn new(sources: Vec<Arc<dyn YearSource>>) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Names of the configured sources, in priority order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve a year; never fails
    pub async fn resolve(&self, query: &TrackQuery) -> ReleaseYear {
        self.resolve_with_source(query).await.year
    }

    /// Resolve a year and report which source produced it
    pub async fn resolve_with_source(&self, query: &TrackQuery) -> Resolution {
        let key = (
            query.artist.clone(),
            query.search_title.clone(),
            query.album_id.clone(),
        );
        if let Some(cached) = self.cache.lock().await.get(&key) {
            debug!(artist = %query.artist, title = %query.search_title, "Release year cache hit");
            return cached.clone();
        }

        let resolution = first_success(self.sources.iter(), |source| self.attempt(source, query))
            .await
            .unwrap_or(Resolution {
                year: ReleaseYear::Unknown,
                source: None,
            });

        match resolution.source {
            Some(source) => info!(
                artist = %query.artist,
                title = %query.title,
                year = %resolution.year,
                source = source,
                "Release year resolved"
            ),
            None => info!(
                artist = %query.artist,
                title = %query.title,
                "No source produced a release year"
            ),
        }

        self.cache.lock().await.insert(key, resolution.clone());
        resolution
    }

    /// One cascade stage: earliest year from a single source
    async fn attempt(&self, source: &Arc<dyn YearSource>, query: &TrackQuery) -> Option<Resolution> {
        let name = source.name();
        match source.fetch(query).await {
            Ok(candidates) => {
                let year = ReleaseYear::earliest(&candidates);
                debug!(
                    source = name,
                    candidates = candidates.len(),
                    year = ?year,
                    "Source queried"
                );
                year.map(|year| Resolution {
                    year,
                    source: Some(name),
                })
            }
            Err(e) => {
                warn!(
                    source = name,
                    artist = %query.artist,
                    title = %query.search_title,
                    error = %e,
                    "Source failed, falling through to next source"
                );
                None
            }
        }
    }
}

// ============================================================================
// Mock Source for Testing
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::types::{CandidateDate, SourceError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock source returning fixed dates (or failing) and counting calls
    pub struct MockSource {
        pub name: &'static str,
        pub dates: Vec<&'static str>,
        pub should_fail: bool,
        pub calls: AtomicUsize,
    }

    impl MockSource {
        pub fn new(name: &'static str, dates: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                name,
                dates,
                should_fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                dates: Vec::new(),
                should_fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl YearSource for MockSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self, _query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(SourceError::Network("Mock failure".to_string()))
            } else {
                Ok(self.dates.iter().map(|d| CandidateDate::new(*d, None)).collect())
            }
        }
    }
}
