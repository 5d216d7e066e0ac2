use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::OrderKey;
use crate::source::{Audio, Record};

/// Names starting with this are hidden from the playlists listing
pub const PRIVATE_PLAYLIST_PREFIX: char = '_';

/// Reserved name of the favorites playlist
pub const FAVORITES_PLAYLIST: &str = "_favourite";

/// Playlist metadata
///
/// `track_count` and `artwork` are derived from the membership rows when read;
/// they are ignored on write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbPlaylist {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub track_count: i64,
    /// Artwork of the most recently ordered member
    pub artwork: Option<String>,
}

impl DbPlaylist {
    pub fn is_private(&self) -> bool {
        self.name.starts_with(PRIVATE_PLAYLIST_PREFIX)
    }

    pub fn is_favorites(&self) -> bool {
        self.name == FAVORITES_PLAYLIST
    }
}

impl Record for DbPlaylist {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn compare(&self, other: &Self, order: OrderKey) -> Ordering {
        match order {
            OrderKey::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            OrderKey::DateModified => self.date_modified.cmp(&other.date_modified),
            _ => Ordering::Equal,
        }
    }
}

/// One playlist's reference to one media URI
///
/// `(playlist_id, uri)` is unique in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbPlaylistTrack {
    pub playlist_id: i64,
    pub uri: String,
    /// Play order rank; negative asks for append
    pub order: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<String>,
    pub mime_type: Option<String>,
}

impl DbPlaylistTrack {
    pub fn new(playlist_id: i64, uri: &str, title: &str, artist: &str, album: &str) -> Self {
        DbPlaylistTrack {
            playlist_id,
            uri: uri.to_string(),
            order: -1,
            title: title.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            artwork: None,
            mime_type: None,
        }
    }

    /// Membership row for `audio`, appended unless an order is set afterwards
    pub fn from_audio(playlist_id: i64, audio: &Audio) -> Self {
        DbPlaylistTrack {
            playlist_id,
            uri: audio.uri(),
            order: -1,
            title: audio.title.clone(),
            artist: audio.artist.clone(),
            album: audio.album.clone(),
            artwork: Some(audio.artwork_uri()),
            mime_type: audio.mime_type.clone(),
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Same row moved to another playlist
    pub fn for_playlist(&self, playlist_id: i64) -> Self {
        DbPlaylistTrack {
            playlist_id,
            ..self.clone()
        }
    }
}

impl Record for DbPlaylistTrack {
    fn key(&self) -> String {
        self.uri.clone()
    }

    fn name(&self) -> &str {
        &self.title
    }
}

/// Items that can be written into a playlist
pub trait PlaylistEntry {
    fn to_track(&self, playlist_id: i64) -> DbPlaylistTrack;
}

impl PlaylistEntry for Audio {
    fn to_track(&self, playlist_id: i64) -> DbPlaylistTrack {
        DbPlaylistTrack::from_audio(playlist_id, self)
    }
}

impl PlaylistEntry for DbPlaylistTrack {
    fn to_track(&self, playlist_id: i64) -> DbPlaylistTrack {
        self.for_playlist(playlist_id).with_order(-1)
    }
}
