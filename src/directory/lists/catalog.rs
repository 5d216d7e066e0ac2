use std::sync::Arc;

use crate::directory::headers::first_letter;
use crate::directory::{DirectorySource, ListKind};
use crate::filter::{Filter, OrderKey};
use crate::source::{
    Album, Artist, ChangeStream, Folder, Genre, Query, RecordSource, Resource, SourceError,
};

pub struct ArtistsList {
    source: Arc<dyn RecordSource>,
}

impl ArtistsList {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        ArtistsList { source }
    }
}

#[async_trait::async_trait]
impl DirectorySource for ArtistsList {
    type Item = Artist;

    fn kind(&self) -> ListKind {
        ListKind::Artists
    }

    fn name(&self) -> String {
        "artists".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.source.observe(Resource::Artists)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Artist>, SourceError> {
        self.source.artists(&Query::from_filter(filter)).await
    }

    fn header(&self, artist: &Artist, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&artist.name),
            _ => String::new(),
        }
    }
}

pub struct AlbumsList {
    source: Arc<dyn RecordSource>,
}

impl AlbumsList {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        AlbumsList { source }
    }
}

#[async_trait::async_trait]
impl DirectorySource for AlbumsList {
    type Item = Album;

    fn kind(&self) -> ListKind {
        ListKind::Albums
    }

    fn name(&self) -> String {
        "albums".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.source.observe(Resource::Albums)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Album>, SourceError> {
        self.source.albums(&Query::from_filter(filter)).await
    }

    fn header(&self, album: &Album, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&album.title),
            OrderKey::Artist => album.artist.clone(),
            _ => String::new(),
        }
    }
}

pub struct GenresList {
    source: Arc<dyn RecordSource>,
}

impl GenresList {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        GenresList { source }
    }
}

#[async_trait::async_trait]
impl DirectorySource for GenresList {
    type Item = Genre;

    fn kind(&self) -> ListKind {
        ListKind::Genres
    }

    fn name(&self) -> String {
        "genres".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.source.observe(Resource::Genres)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Genre>, SourceError> {
        self.source.genres(&Query::from_filter(filter)).await
    }

    fn header(&self, genre: &Genre, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&genre.name),
            _ => String::new(),
        }
    }
}

pub struct FoldersList {
    source: Arc<dyn RecordSource>,
}

impl FoldersList {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        FoldersList { source }
    }
}

#[async_trait::async_trait]
impl DirectorySource for FoldersList {
    type Item = Folder;

    fn kind(&self) -> ListKind {
        ListKind::Folders
    }

    fn name(&self) -> String {
        "folders".to_string()
    }

    fn subscribe(&self) -> ChangeStream {
        self.source.observe(Resource::Folders)
    }

    async fn fetch(&self, filter: &Filter) -> Result<Vec<Folder>, SourceError> {
        self.source.folders(&Query::from_filter(filter)).await
    }

    fn header(&self, folder: &Folder, order: OrderKey) -> String {
        match order {
            OrderKey::Name => first_letter(&folder.name),
            _ => String::new(),
        }
    }
}
