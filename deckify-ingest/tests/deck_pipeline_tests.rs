//! Integration tests for deck building and writing
//!
//! A paginated in-memory listing feeds the real builder, enricher and
//! resolver; year sources and the code generator are in-process fakes.

use async_trait::async_trait;
use deckify_common::Error;
use deckify_ingest::{
    write_deck, CandidateDate, CodeGenerator, DeckBuilder, ListingKind, ListingPage, ListingRef,
    ListingSource, ReleaseYear, ReleaseYearResolver, ScanCode, SourceError, TrackEnricher, TrackQuery,
    YearSource,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Fakes
// ============================================================================

/// Listing served from memory; `None` pages fail when requested
struct PagedListing {
    first: Option<ListingPage>,
    pages: HashMap<String, Option<ListingPage>>,
}

#[async_trait]
impl ListingSource for PagedListing {
    async fn first_page(&self, _listing: &ListingRef) -> Result<ListingPage, SourceError> {
        self.first
            .clone()
            .ok_or_else(|| SourceError::Api("HTTP 404 Not Found".to_string()))
    }

    async fn next_page(&self, next: &str) -> Result<ListingPage, SourceError> {
        self.pages
            .get(next)
            .cloned()
            .flatten()
            .ok_or_else(|| SourceError::Network("connection reset".to_string()))
    }
}

/// Years keyed by normalized title; some titles resolve only at a later stage
struct TitleYears {
    name: &'static str,
    years: HashMap<&'static str, &'static str>,
}

#[async_trait]
impl YearSource for TitleYears {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, query: &TrackQuery) -> Result<Vec<CandidateDate>, SourceError> {
        Ok(self
            .years
            .get(query.search_title.as_str())
            .map(|date| vec![CandidateDate::new(*date, None)])
            .unwrap_or_default())
    }
}

struct UrlCode;

impl CodeGenerator for UrlCode {
    fn generate(&self, url: &str) -> deckify_common::Result<ScanCode> {
        Ok(ScanCode {
            svg: format!("<svg>{}</svg>", url),
        })
    }
}

fn playlist_item(id: &str, artist: &str, title: &str) -> Value {
    json!({"track": {
        "id": id,
        "name": title,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{id}")},
        "artists": [{"name": artist}],
        "album": {"id": format!("album-{id}")}
    }})
}

fn page(items: Vec<Value>, next: Option<&str>) -> ListingPage {
    ListingPage {
        items,
        next: next.map(str::to_string),
    }
}

fn playlist() -> ListingRef {
    ListingRef::parse("https://open.spotify.com/playlist/37i9dQZF1DX4o1oenSJRJd?si=abc").unwrap()
}

fn builder(listing: PagedListing) -> DeckBuilder {
    let primary = TitleYears {
        name: "Primary",
        years: HashMap::from([("Alpha", "1991"), ("Gamma", "1983-05")]),
    };
    let fallback = TitleYears {
        name: "Fallback",
        years: HashMap::from([("Beta", "2004-10-12"), ("Alpha", "1950")]),
    };
    let resolver = ReleaseYearResolver::new(vec![Arc::new(primary), Arc::new(fallback)]);

    DeckBuilder::new(
        Arc::new(listing),
        TrackEnricher::new(Arc::new(resolver), Arc::new(UrlCode)),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_order_preserved_across_pages_and_stages() {
    let listing = PagedListing {
        first: Some(page(
            vec![
                playlist_item("t1", "A", "Beta - 2011 Remaster"),
                json!({"track": null}),
                playlist_item("t2", "B", "Alpha"),
            ],
            Some("page-2"),
        )),
        pages: HashMap::from([(
            "page-2".to_string(),
            Some(page(
                vec![playlist_item("t3", "C", "Gamma (Live)"), playlist_item("t4", "D", "Delta")],
                None,
            )),
        )]),
    };

    let deck = builder(listing).build(&playlist()).await.unwrap();

    let ids: Vec<_> = deck.iter().map(|t| t.identity.track_id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4"]);

    let years: Vec<_> = deck.iter().map(|t| t.year).collect();
    assert_eq!(
        years,
        vec![
            ReleaseYear::Known(2004),
            ReleaseYear::Known(1991),
            ReleaseYear::Known(1983),
            ReleaseYear::Unknown,
        ]
    );

    // Display title stays raw
    assert_eq!(deck[0].title(), "Beta - 2011 Remaster");
    assert_eq!(deck[2].code.svg, "<svg>https://open.spotify.com/track/t3</svg>");
}

#[tokio::test]
async fn test_later_page_failure_keeps_gathered_tracks() {
    let listing = PagedListing {
        first: Some(page(vec![playlist_item("t1", "A", "Alpha")], Some("page-2"))),
        pages: HashMap::from([("page-2".to_string(), None)]),
    };

    let deck = builder(listing).build(&playlist()).await.unwrap();

    assert_eq!(deck.len(), 1);
    assert_eq!(deck[0].year, ReleaseYear::Known(1991));
}

#[tokio::test]
async fn test_first_page_failure_is_listing_error() {
    let listing = PagedListing {
        first: None,
        pages: HashMap::new(),
    };

    match builder(listing).build(&playlist()).await {
        Err(Error::Listing(msg)) => assert!(msg.contains("37i9dQZF1DX4o1oenSJRJd")),
        other => panic!("expected listing error, got {:?}", other.map(|d| d.len())),
    }
}

#[tokio::test]
async fn test_album_listing_items_use_listing_album() {
    let listing_ref = ListingRef::parse("https://open.spotify.com/album/4LH4d3cOWNNsVw41Gqt2kv").unwrap();
    assert_eq!(listing_ref.kind, ListingKind::Album);

    let listing = PagedListing {
        first: Some(page(
            vec![json!({
                "id": "t9",
                "name": "Alpha",
                "external_urls": {"spotify": "https://open.spotify.com/track/t9"},
                "artists": [{"name": "A"}, {"name": "Featured"}]
            })],
            None,
        )),
        pages: HashMap::new(),
    };

    let deck = builder(listing).build(&listing_ref).await.unwrap();

    assert_eq!(deck.len(), 1);
    assert_eq!(deck[0].artist(), "A");
    assert_eq!(deck[0].identity.album_id.as_deref(), Some("4LH4d3cOWNNsVw41Gqt2kv"));
}

#[tokio::test]
async fn test_built_deck_written_to_disk() {
    let listing = PagedListing {
        first: Some(page(
            vec![playlist_item("t1", "A", "Alpha"), playlist_item("t2", "B", "Unheard Of")],
            None,
        )),
        pages: HashMap::new(),
    };
    let deck = builder(listing).build(&playlist()).await.unwrap();

    let temp_dir = TempDir::new().unwrap();
    let manifest_path = write_deck(temp_dir.path(), "mix", &deck).unwrap();

    let manifest: Value =
        serde_json::from_str(&std::fs::read_to_string(manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.as_array().unwrap().len(), 2);
    assert_eq!(manifest[0]["year"], "1991");
    assert_eq!(manifest[1]["year"], "N/A");
    assert_eq!(manifest[1]["code"], "mix-1.svg");
    assert!(temp_dir.path().join("mix-0.svg").exists());
    assert!(temp_dir.path().join("mix-1.svg").exists());
}
