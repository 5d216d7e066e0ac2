use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::OrderKey;

pub const AUDIO_URI_PREFIX: &str = "media://audio/";
pub const ALBUM_ART_URI_PREFIX: &str = "media://albumart/";

/// Common surface of every browsable item
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable identity used by selection and focus
    fn key(&self) -> String;

    /// Display name; the text query matches against it
    fn name(&self) -> &str;

    /// Ordering under `order`, ascending. Keys a kind does not know compare equal.
    fn compare(&self, other: &Self, order: OrderKey) -> Ordering {
        match order {
            OrderKey::Name => compare_names(self.name(), other.name()),
            _ => Ordering::Equal,
        }
    }
}

pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Sort in place by `order`; a stable sort so ties keep source order
pub fn sort_records<T: Record>(items: &mut [T], order: OrderKey, ascending: bool) {
    items.sort_by(|a, b| {
        let ord = a.compare(b, order);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// A single track of the media catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_id: i64,
    pub path: String,
    pub duration_ms: i64,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub mime_type: Option<String>,
    pub year: Option<i32>,
    pub size: i64,
    pub genre: Option<String>,
}

impl Audio {
    /// Stable media URI; this is what playlists store
    pub fn uri(&self) -> String {
        format!("{}{}", AUDIO_URI_PREFIX, self.id)
    }

    pub fn artwork_uri(&self) -> String {
        format!("{}{}", ALBUM_ART_URI_PREFIX, self.album_id)
    }

    /// Directory containing the file
    pub fn folder(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration_ms / 1000
    }
}

impl Record for Audio {
    fn key(&self) -> String {
        self.uri()
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn compare(&self, other: &Self, order: OrderKey) -> Ordering {
        match order {
            OrderKey::None => Ordering::Equal,
            OrderKey::Name => compare_names(&self.title, &other.title),
            OrderKey::DateModified => self.date_modified.cmp(&other.date_modified),
            OrderKey::DateAdded => self.date_added.cmp(&other.date_added),
            OrderKey::Artist => compare_names(&self.artist, &other.artist),
            OrderKey::Album => compare_names(&self.album, &other.album),
            OrderKey::Folder => self.folder().cmp(other.folder()),
            OrderKey::Length => self.duration_ms.cmp(&other.duration_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub tracks: u32,
    pub albums: u32,
}

impl Record for Artist {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub tracks: u32,
}

impl Album {
    pub fn artwork_uri(&self) -> String {
        format!("{}{}", ALBUM_ART_URI_PREFIX, self.id)
    }
}

impl Record for Album {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn compare(&self, other: &Self, order: OrderKey) -> Ordering {
        match order {
            OrderKey::Name => compare_names(&self.title, &other.title),
            OrderKey::Artist => compare_names(&self.artist, &other.artist),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub tracks: u32,
}

impl Record for Genre {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub path: String,
    pub name: String,
    pub tracks: u32,
    pub size: i64,
    pub date_modified: DateTime<Utc>,
}

impl Record for Folder {
    fn key(&self) -> String {
        self.path.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn audio(id: i64, title: &str, path: &str, duration_ms: i64) -> Audio {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Audio {
            id,
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            album_id: 7,
            path: path.to_string(),
            duration_ms,
            date_added: date,
            date_modified: date,
            mime_type: Some("audio/mpeg".to_string()),
            year: None,
            size: 0,
            genre: None,
        }
    }

    #[test]
    fn test_uris_carry_ids() {
        let a = audio(42, "Song", "/music/song.mp3", 1000);
        assert_eq!(a.uri(), "media://audio/42");
        assert_eq!(a.artwork_uri(), "media://albumart/7");
    }

    #[test]
    fn test_folder_of_path() {
        assert_eq!(audio(1, "a", "/music/rock/a.mp3", 0).folder(), "/music/rock");
        assert_eq!(audio(1, "a", "/a.mp3", 0).folder(), "/");
        assert_eq!(audio(1, "a", "a.mp3", 0).folder(), "");
    }

    #[test]
    fn test_sort_records_descending_by_length() {
        let mut items = vec![
            audio(1, "short", "/m/1", 60_000),
            audio(2, "long", "/m/2", 600_000),
            audio(3, "mid", "/m/3", 200_000),
        ];
        sort_records(&mut items, OrderKey::Length, false);
        let ids: Vec<i64> = items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_records_by_name_ignores_case() {
        let mut items = vec![
            audio(1, "beta", "/m/1", 0),
            audio(2, "Alpha", "/m/2", 0),
            audio(3, "Gamma", "/m/3", 0),
        ];
        sort_records(&mut items, OrderKey::Name, true);
        let titles: Vec<&str> = items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "Gamma"]);
    }
}
