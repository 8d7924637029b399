//! Catalog listings (albums and playlists)
//!
//! A listing is selected once per run from the user's URL. The
//! [`ListingKind`] decides both which endpoint pages come from and how a raw
//! item is unwrapped into a [`TrackIdentity`]: playlist items wrap the track
//! under `track`, album items are the track itself.

use crate::types::{SourceError, TrackIdentity};
use async_trait::async_trait;
use deckify_common::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;

/// Kind of catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Album,
    Playlist,
}

impl ListingKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "album" => Some(Self::Album),
            "playlist" => Some(Self::Playlist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Playlist => "playlist",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed listing reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRef {
    pub kind: ListingKind,
    pub id: String,
}

impl ListingRef {
    /// Parse a catalog URL such as
    /// `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc`.
    ///
    /// The first `album` or `playlist` path segment followed by a non-empty
    /// segment wins; the query string is ignored.
    ///
    /// # Errors
    /// `Error::InvalidInput` when the text is not a URL or names neither an
    /// album nor a playlist.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())
            .map_err(|e| Error::InvalidInput(format!("'{}' is not a URL: {}", input, e)))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();

        segments
            .windows(2)
            .find_map(|pair| {
                let kind = ListingKind::from_segment(pair[0])?;
                (!pair[1].is_empty()).then(|| Self {
                    kind,
                    id: pair[1].to_string(),
                })
            })
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "'{}' is not an album or playlist URL. URL should be of type 'album' or 'playlist'.",
                    input
                ))
            })
    }

    /// Extract the identity of one raw listing item
    ///
    /// Returns `None` (and logs why at debug level) when any required field
    /// is missing: track id, name, playable URL or the artists array. An
    /// empty artists array is accepted and yields an identity without artist.
    pub fn extract_identity(&self, item: &Value) -> Option<TrackIdentity> {
        match self.try_extract_identity(item) {
            Ok(identity) => Some(identity),
            Err(reason) => {
                debug!(listing = %self.id, kind = %self.kind, reason = %reason, "Dropping listing item");
                None
            }
        }
    }

    fn try_extract_identity(&self, item: &Value) -> std::result::Result<TrackIdentity, String> {
        let track: RawTrack = match self.kind {
            ListingKind::Playlist => {
                let wrapped: PlaylistItem =
                    serde_json::from_value(item.clone()).map_err(|e| e.to_string())?;
                wrapped.track.ok_or("playlist item has no track")?
            }
            ListingKind::Album => serde_json::from_value(item.clone()).map_err(|e| e.to_string())?,
        };

        let track_id = track.id.ok_or("missing track id")?;
        let title = track.name.ok_or("missing track name")?;
        let url = track
            .external_urls
            .and_then(|urls| urls.spotify)
            .ok_or("missing playable URL")?;
        let artists = track.artists.ok_or("missing artists")?;
        let artist = match artists.into_iter().next() {
            Some(first) => Some(first.name.ok_or("artist without name")?),
            None => None,
        };

        let album_id = track.album.and_then(|album| album.id).or_else(|| match self.kind {
            ListingKind::Album => Some(self.id.clone()),
            ListingKind::Playlist => None,
        });

        Ok(TrackIdentity {
            track_id,
            artist,
            title,
            album_id,
            url,
        })
    }
}

impl fmt::Display for ListingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Vec<Value>,
    /// Link to the following page, absent on the last one
    #[serde(default)]
    pub next: Option<String>,
}

/// Paginated listing provider
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// First page of the listing
    async fn first_page(&self, listing: &ListingRef) -> std::result::Result<ListingPage, SourceError>;

    /// Page behind a `next` link
    async fn next_page(&self, next: &str) -> std::result::Result<ListingPage, SourceError>;
}

// ============================================================================
// Raw item shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    track: Option<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    external_urls: Option<ExternalUrls>,
    #[serde(default)]
    artists: Option<Vec<RawArtist>>,
    #[serde(default)]
    album: Option<RawAlbum>,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    #[serde(default)]
    id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track_json(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "external_urls": {"spotify": format!("https://open.spotify.com/track/{id}")},
            "artists": [{"name": "First"}, {"name": "Second"}],
            "album": {"id": "album-1", "name": "Album"}
        })
    }

    #[test]
    fn test_parse_playlist_url() {
        let parsed =
            ListingRef::parse("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123").unwrap();
        assert_eq!(parsed.kind, ListingKind::Playlist);
        assert_eq!(parsed.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn test_parse_album_url_with_locale_prefix() {
        let parsed = ListingRef::parse("https://open.spotify.com/intl-de/album/4LH4d3cOWNNsVw41Gqt2kv").unwrap();
        assert_eq!(parsed.kind, ListingKind::Album);
        assert_eq!(parsed.id, "4LH4d3cOWNNsVw41Gqt2kv");
        assert_eq!(parsed.to_string(), "album:4LH4d3cOWNNsVw41Gqt2kv");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for input in [
            "https://open.spotify.com/track/6rqhFgbbKwnb9MLmUQDhG6",
            "https://open.spotify.com/album/",
            "https://open.spotify.com/album",
            "not a url",
            "",
        ] {
            assert!(
                matches!(ListingRef::parse(input), Err(Error::InvalidInput(_))),
                "expected '{input}' to be rejected"
            );
        }
    }

    #[test]
    fn test_extract_playlist_item() {
        let listing = ListingRef { kind: ListingKind::Playlist, id: "p1".to_string() };
        let item = json!({"added_at": "2024-01-01T00:00:00Z", "track": track_json("t1", "Song (Live)")});

        let identity = listing.extract_identity(&item).unwrap();
        assert_eq!(identity.track_id, "t1");
        assert_eq!(identity.title, "Song (Live)");
        assert_eq!(identity.artist.as_deref(), Some("First"));
        assert_eq!(identity.album_id.as_deref(), Some("album-1"));
        assert_eq!(identity.url, "https://open.spotify.com/track/t1");
    }

    #[test]
    fn test_extract_bare_album_item_uses_listing_id_for_album() {
        let listing = ListingRef { kind: ListingKind::Album, id: "album-9".to_string() };
        let mut item = track_json("t2", "Song");
        item.as_object_mut().unwrap().remove("album");

        let identity = listing.extract_identity(&item).unwrap();
        assert_eq!(identity.album_id.as_deref(), Some("album-9"));
    }

    #[test]
    fn test_extract_wrong_shape_for_kind_is_dropped() {
        let playlist = ListingRef { kind: ListingKind::Playlist, id: "p1".to_string() };
        // Bare item where a wrapped one is expected
        assert!(playlist.extract_identity(&track_json("t1", "Song")).is_none());
    }

    #[test]
    fn test_extract_missing_fields_dropped() {
        let listing = ListingRef { kind: ListingKind::Album, id: "a".to_string() };

        for field in ["id", "name", "external_urls", "artists"] {
            let mut item = track_json("t1", "Song");
            item.as_object_mut().unwrap().remove(field);
            assert!(listing.extract_identity(&item).is_none(), "missing {field} should drop");
        }

        let mut local_file = track_json("t1", "Song");
        local_file["id"] = Value::Null;
        assert!(listing.extract_identity(&local_file).is_none());

        let playlist = ListingRef { kind: ListingKind::Playlist, id: "p".to_string() };
        assert!(playlist.extract_identity(&json!({"track": null})).is_none());
    }

    #[test]
    fn test_extract_empty_artists_gives_no_artist() {
        let listing = ListingRef { kind: ListingKind::Album, id: "a".to_string() };
        let mut item = track_json("t1", "Song");
        item["artists"] = json!([]);

        let identity = listing.extract_identity(&item).unwrap();
        assert!(identity.artist.is_none());
    }

    #[test]
    fn test_listing_page_deserializes_without_next() {
        let page: ListingPage = serde_json::from_value(json!({"items": [{"a": 1}], "next": null})).unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(page.next.is_none());
    }
}
