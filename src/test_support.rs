// Test support utilities for both unit and integration tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tokio::sync::broadcast;

use crate::notify::{Notifier, Toast, UserAction};
use crate::playback::{PlayableRef, Remote};
use crate::source::{
    Album, Artist, Audio, ChangeEvent, ChangeStream, Folder, Genre, Query, RecordSource, Resource,
    Scope, SourceError,
};

/// A plain audio record for tests
pub fn sample_audio(id: i64, title: &str, path: &str, duration_ms: i64) -> Audio {
    let date = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
    Audio {
        id,
        title: title.to_string(),
        artist: "Unknown Artist".to_string(),
        album: "Unknown Album".to_string(),
        album_id: 1,
        path: path.to_string(),
        duration_ms,
        date_added: date,
        date_modified: date,
        mime_type: Some("audio/mpeg".to_string()),
        year: None,
        size: 4_000_000,
        genre: None,
    }
}

/// In-memory record source
///
/// Stores records in memory instead of a real catalog. Mutations are silent;
/// call [`MemorySource::emit`] to publish a change. Queries can be slowed down
/// or made to fail, and are counted.
pub struct MemorySource {
    audios: Mutex<Vec<Audio>>,
    artists: Mutex<Vec<Artist>>,
    albums: Mutex<Vec<Album>>,
    genres: Mutex<Vec<Genre>>,
    folders: Mutex<Vec<Folder>>,
    channels: HashMap<Resource, broadcast::Sender<ChangeEvent>>,
    latency: Mutex<Duration>,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl Default for MemorySource {
    fn default() -> Self {
        let channels = [
            Resource::Audios,
            Resource::Artists,
            Resource::Albums,
            Resource::Genres,
            Resource::Folders,
            Resource::Playlists,
        ]
        .into_iter()
        .map(|resource| (resource, broadcast::channel(64).0))
        .collect();

        MemorySource {
            audios: Mutex::new(Vec::new()),
            artists: Mutex::new(Vec::new()),
            albums: Mutex::new(Vec::new()),
            genres: Mutex::new(Vec::new()),
            folders: Mutex::new(Vec::new()),
            channels,
            latency: Mutex::new(Duration::ZERO),
            failing: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        }
    }
}

impl MemorySource {
    #[allow(unused)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_audio(&self, audio: Audio) {
        let mut audios = self.audios.lock().unwrap();
        audios.retain(|a| a.id != audio.id);
        audios.push(audio);
    }

    pub fn remove_audio(&self, id: i64) {
        self.audios.lock().unwrap().retain(|a| a.id != id);
    }

    pub fn put_artist(&self, artist: Artist) {
        self.artists.lock().unwrap().push(artist);
    }

    pub fn put_album(&self, album: Album) {
        self.albums.lock().unwrap().push(album);
    }

    pub fn put_genre(&self, genre: Genre) {
        self.genres.lock().unwrap().push(genre);
    }

    pub fn put_folder(&self, folder: Folder) {
        self.folders.lock().unwrap().push(folder);
    }

    /// Publish a change for `resource`
    pub fn emit(&self, resource: Resource) {
        if let Some(tx) = self.channels.get(&resource) {
            let _ = tx.send(ChangeEvent { resource });
        }
    }

    /// Live subscriptions to `resource`
    pub fn subscriber_count(&self, resource: Resource) -> usize {
        self.channels
            .get(&resource)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Delay every query by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of list queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn begin_query(&self) -> Result<(), SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("memory source offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordSource for MemorySource {
    async fn audios(&self, scope: &Scope, query: &Query) -> Result<Vec<Audio>, SourceError> {
        self.begin_query().await?;
        let audios: Vec<Audio> = self
            .audios
            .lock()
            .unwrap()
            .iter()
            .filter(|a| scope.contains(a))
            .cloned()
            .collect();
        Ok(query.apply(audios))
    }

    async fn artists(&self, query: &Query) -> Result<Vec<Artist>, SourceError> {
        self.begin_query().await?;
        let artists = self.artists.lock().unwrap().clone();
        Ok(query.apply(artists))
    }

    async fn albums(&self, query: &Query) -> Result<Vec<Album>, SourceError> {
        self.begin_query().await?;
        let albums = self.albums.lock().unwrap().clone();
        Ok(query.apply(albums))
    }

    async fn genres(&self, query: &Query) -> Result<Vec<Genre>, SourceError> {
        self.begin_query().await?;
        let genres = self.genres.lock().unwrap().clone();
        Ok(query.apply(genres))
    }

    async fn folders(&self, query: &Query) -> Result<Vec<Folder>, SourceError> {
        self.begin_query().await?;
        let folders = self.folders.lock().unwrap().clone();
        Ok(query.apply(folders))
    }

    async fn find_audio(&self, id: i64) -> Result<Option<Audio>, SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("memory source offline".to_string()));
        }
        Ok(self.audios.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    fn observe(&self, resource: Resource) -> ChangeStream {
        match self.channels.get(&resource) {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }
}

/// Notifier that records every toast and answers with a preset action
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
    response: Mutex<UserAction>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        RecordingNotifier {
            toasts: Mutex::new(Vec::new()),
            response: Mutex::new(UserAction::Dismissed),
        }
    }
}

impl RecordingNotifier {
    #[allow(unused)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every later toast with `action`
    pub fn respond_with(&self, action: UserAction) {
        *self.response.lock().unwrap() = action;
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.message).collect()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, toast: Toast) -> UserAction {
        self.toasts.lock().unwrap().push(toast);
        *self.response.lock().unwrap()
    }
}

/// A call made on [`RecordingRemote`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Play {
        shuffle: bool,
        start_index: usize,
        items: Vec<PlayableRef>,
    },
    Add {
        items: Vec<PlayableRef>,
        index: Option<usize>,
    },
}

/// Playback remote that records requests against a fake queue
pub struct RecordingRemote {
    calls: Mutex<Vec<RemoteCall>>,
    queue: Mutex<Vec<String>>,
    next_index: AtomicUsize,
}

impl Default for RecordingRemote {
    fn default() -> Self {
        RecordingRemote {
            calls: Mutex::new(Vec::new()),
            queue: Mutex::new(Vec::new()),
            next_index: AtomicUsize::new(0),
        }
    }
}

impl RecordingRemote {
    #[allow(unused)] // Used in tests
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend these uris are queued already
    pub fn set_queue(&self, uris: &[&str]) {
        *self.queue.lock().unwrap() = uris.iter().map(|u| u.to_string()).collect();
    }

    pub fn set_next_index(&self, index: usize) {
        self.next_index.store(index, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Remote for RecordingRemote {
    async fn request_play(&self, shuffle: bool, start_index: usize, items: Vec<PlayableRef>) {
        *self.queue.lock().unwrap() = items.iter().map(|i| i.uri.clone()).collect();
        self.calls.lock().unwrap().push(RemoteCall::Play {
            shuffle,
            start_index,
            items,
        });
    }

    async fn seek_to(&self, uri: &str) -> bool {
        self.queue.lock().unwrap().iter().any(|u| u == uri)
    }

    async fn next_queue_index(&self) -> usize {
        self.next_index.load(Ordering::SeqCst)
    }

    async fn add(&self, items: Vec<PlayableRef>, index: Option<usize>) -> usize {
        let count = items.len();
        self.calls
            .lock()
            .unwrap()
            .push(RemoteCall::Add { items, index });
        count
    }
}
