mod exclusion;
mod models;

pub use exclusion::{ExclusionFilter, FilteredSource};
pub use models::{
    sort_records, Album, Artist, Audio, Folder, Genre, Record,
    ALBUM_ART_URI_PREFIX, AUDIO_URI_PREFIX,
};

use thiserror::Error;
use tokio::sync::broadcast;

use crate::filter::{text_matches, Filter, OrderKey};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Permission denied: {0}")]
    Permission(String),
}

/// Resources a change stream can be watched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Audios,
    Artists,
    Albums,
    Genres,
    Folders,
    Playlists,
}

/// Something visible to `resource` changed. Carries nothing else; always re-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub resource: Resource,
}

pub type ChangeStream = broadcast::Receiver<ChangeEvent>;

/// Which audios a track list shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    Folder(String),
    Artist(String),
    Album(String),
    Genre(String),
}

impl Scope {
    pub fn contains(&self, audio: &Audio) -> bool {
        match self {
            Scope::All => true,
            Scope::Folder(path) => audio.folder() == path,
            Scope::Artist(name) => &audio.artist == name,
            Scope::Album(name) => &audio.album == name,
            Scope::Genre(name) => audio.genre.as_deref() == Some(name.as_str()),
        }
    }
}

/// Parameters of one catalog query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
    pub order: OrderKey,
    pub ascending: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from_filter(filter: &Filter) -> Self {
        Query {
            text: filter.query.clone(),
            order: filter.order,
            ascending: filter.ascending,
            offset: 0,
            limit: None,
        }
    }

    /// Case-insensitive substring match on a display name
    pub fn matches(&self, name: &str) -> bool {
        text_matches(self.text.as_deref(), name)
    }

    /// Apply text match, ordering and paging to an unordered candidate list
    pub fn apply<T: Record>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut matched: Vec<T> = items.into_iter().filter(|r| self.matches(r.name())).collect();
        sort_records(&mut matched, self.order, self.ascending);
        let page = matched.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::from_filter(&Filter::default())
    }
}

/// The external media catalog.
///
/// Implementations talk to whatever owns the media (a platform content provider,
/// a scanner database, a remote library). Records come back already ordered and
/// text-filtered according to the query.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    async fn audios(&self, scope: &Scope, query: &Query) -> Result<Vec<Audio>, SourceError>;

    async fn artists(&self, query: &Query) -> Result<Vec<Artist>, SourceError>;

    async fn albums(&self, query: &Query) -> Result<Vec<Album>, SourceError>;

    async fn genres(&self, query: &Query) -> Result<Vec<Genre>, SourceError>;

    async fn folders(&self, query: &Query) -> Result<Vec<Folder>, SourceError>;

    async fn find_audio(&self, id: i64) -> Result<Option<Audio>, SourceError>;

    /// Subscribe to change notifications for a resource
    fn observe(&self, resource: Resource) -> ChangeStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(id: i64, name: &str) -> Artist {
        Artist {
            id,
            name: name.to_string(),
            tracks: 1,
            albums: 1,
        }
    }

    #[test]
    fn test_query_apply_filters_sorts_and_pages() {
        let query = Query {
            text: Some("the".to_string()),
            order: OrderKey::Name,
            ascending: true,
            offset: 1,
            limit: Some(1),
        };
        let items = vec![
            artist(1, "The Who"),
            artist(2, "Blur"),
            artist(3, "The Beatles"),
            artist(4, "Other Lives"),
        ];
        let page = query.apply(items);
        // Matches sorted: Other Lives, The Beatles, The Who
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "The Beatles");
    }

    #[test]
    fn test_empty_text_matches_everything() {
        let query = Query {
            text: Some(String::new()),
            ..Query::default()
        };
        assert!(query.matches("anything"));
    }
}
