use std::sync::Arc;

use crate::directory::headers::{first_letter, folder_name, length_bucket, month};
use crate::directory::{DirectorySource, ListKind};
use crate::filter::{Filter, OrderKey};
use crate::source::{Audio, ChangeStream, Query, RecordSource, Resource, Scope, SourceError};

/// Tracks of the catalog, all of them or one folder / artist / album / genre
pub struct AudiosList {
    source: Arc<dyn RecordSource>,
    scope: Scope,
}

impl AudiosList {
    pub fn new(source: Arc<dyn RecordSource>, scope: Scope) -> Self {
        AudiosList { source, scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

#[async_trait::async_trait]
impl DirectorySource for AudiosList {
    type Item = Audio;

    fn kind(&self) -> ListKind {
        ListKind::Audios {
            by_artist: matches!(self.scope, Scope::Artist(_)),
            by_album: matches!(self.scope, Scope::Album(_)),
        }
    }

    fn name(&self) -> String {
        let scope = match self.scope {
            Scope::All => "all",
            Scope::Folder(_) => "folder",
            Scope::Artist(_) => "artist",
            Scope::Album(_) => "album",
            Scope::Genre(_) => "genre",
        };
        format!("audios.{}", scope)
    }

    fn subscribe(&self) -> ChangeStream {
        self.source.observe(Resource::Audios)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Audio>, SourceError> {
        self.source
            .audios(&self.scope, &Query::from_filter(filter))
            .await
    }

    fn header(&self, audio: &Audio, order: OrderKey) -> String {
        match order {
            OrderKey::None => String::new(),
            OrderKey::Name => first_letter(&audio.title),
            OrderKey::DateModified => month(&audio.date_modified),
            OrderKey::DateAdded => month(&audio.date_added),
            OrderKey::Artist => audio.artist.clone(),
            OrderKey::Album => audio.album.clone(),
            OrderKey::Folder => folder_name(audio.folder()),
            OrderKey::Length => length_bucket(audio.duration_ms),
        }
    }
}
