use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::commands::Commands;
use crate::config::Config;
use crate::db::Database;
use crate::directory::lists::{
    AlbumsList, ArtistsList, AudiosList, FoldersList, GenresList, MembersList, PlaylistsList,
};
use crate::directory::{Directory, DirectorySource};
use crate::notify::Notifier;
use crate::playback::Remote;
use crate::playlists::{PlaylistError, PlaylistManager};
use crate::preferences::FilterStore;
use crate::source::{FilteredSource, RecordSource, Scope};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),
}

/// Everything a host needs to browse the library and edit playlists
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub source: Arc<dyn RecordSource>,
    pub playlists: PlaylistManager,
    pub filters: FilterStore,
    pub notifier: Arc<dyn Notifier>,
    pub commands: Commands,
}

impl AppContext {
    /// Open the playlist store under the configured data dir and put the
    /// exclusion filter in front of `source`
    pub async fn open<S: RecordSource + 'static>(
        config: Config,
        source: S,
        remote: Arc<dyn Remote>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ContextError> {
        std::fs::create_dir_all(&config.data_dir)?;
        let database_path = config.database_path();
        let database = Database::new(&database_path.to_string_lossy()).await?;

        let source: Arc<dyn RecordSource> =
            Arc::new(FilteredSource::new(source, config.exclusion()));
        let playlists = PlaylistManager::new(database.clone(), source.clone()).await?;
        let filters = FilterStore::new(database);
        let commands = Commands::new(playlists.clone(), remote, notifier.clone());

        info!("Media library ready at {}", config.data_dir.display());
        Ok(AppContext {
            config,
            source,
            playlists,
            filters,
            notifier,
            commands,
        })
    }

    /// Open any list with its remembered filter
    pub async fn directory<D: DirectorySource>(&self, list: D) -> Directory<D> {
        Directory::open(
            list,
            self.notifier.clone(),
            self.filters.clone(),
            self.config.debounce,
        )
        .await
    }

    pub async fn audios(&self, scope: Scope) -> Directory<AudiosList> {
        self.directory(AudiosList::new(self.source.clone(), scope))
            .await
    }

    pub async fn artists(&self) -> Directory<ArtistsList> {
        self.directory(ArtistsList::new(self.source.clone())).await
    }

    pub async fn albums(&self) -> Directory<AlbumsList> {
        self.directory(AlbumsList::new(self.source.clone())).await
    }

    pub async fn genres(&self) -> Directory<GenresList> {
        self.directory(GenresList::new(self.source.clone())).await
    }

    pub async fn folders(&self) -> Directory<FoldersList> {
        self.directory(FoldersList::new(self.source.clone())).await
    }

    pub async fn playlists(&self) -> Directory<PlaylistsList> {
        self.directory(PlaylistsList::new(self.playlists.clone()))
            .await
    }

    pub async fn members(&self, playlist_id: i64) -> Directory<MembersList> {
        self.directory(MembersList::new(self.playlists.clone(), playlist_id))
            .await
    }
}
