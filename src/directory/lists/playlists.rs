use crate::db::{DbPlaylist, DbPlaylistTrack};
use crate::directory::headers::{first_letter, month};
use crate::directory::{DirectorySource, ListKind};
use crate::filter::{Filter, OrderKey};
use crate::playlists::PlaylistManager;
use crate::source::{sort_records, ChangeStream, SourceError};

/// User playlists, private ones (favorites) excluded
pub struct PlaylistsList {
    manager: PlaylistManager,
}

impl PlaylistsList {
    pub fn new(manager: PlaylistManager) -> Self {
        PlaylistsList { manager }
    }
}

#[async_trait::async_trait]
impl DirectorySource for PlaylistsList {
    type Item = DbPlaylist;

    fn kind(&self) -> ListKind {
        ListKind::Playlists
    }

    fn name(&self) -> String {
        "playlists".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.manager.observe()
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<DbPlaylist>, SourceError> {
        let mut playlists = self.manager.playlists(filter.query()).await?;
        sort_records(&mut playlists, filter.order, filter.ascending);
        Ok(playlists)
    }

    fn header(&self, playlist: &DbPlaylist, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&playlist.name),
            OrderKey::DateModified => month(&playlist.date_modified),
            _ => String::new(),
        }
    }
}

/// Tracks of one playlist, in play order unless sorted by name
pub struct MembersList {
    manager: PlaylistManager,
    playlist_id: i64,
}

impl MembersList {
    pub fn new(manager: PlaylistManager, playlist_id: i64) -> Self {
        MembersList {
            manager,
            playlist_id,
        }
    }

    pub fn playlist_id(&self) -> i64 {
        self.playlist_id
    }

    pub fn manager(&self) -> &PlaylistManager {
        &self.manager
    }
}

#[async_trait::async_trait]
impl DirectorySource for MembersList {
    type Item = DbPlaylistTrack;

    fn kind(&self) -> ListKind {
        ListKind::Members
    }

    fn name(&self) -> String {
        "members".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.manager.observe()
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<DbPlaylistTrack>, SourceError> {
        let mut tracks = self.manager.tracks(self.playlist_id, filter.query()).await?;
        match filter.order {
            // Stored play order
            OrderKey::None if !filter.ascending => tracks.reverse(),
            OrderKey::None => {}
            order => sort_records(&mut tracks, order, filter.ascending),
        }
        Ok(tracks)
    }

    fn header(&self, track: &DbPlaylistTrack, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&track.title),
            _ => String::new(),
        }
    }
}
