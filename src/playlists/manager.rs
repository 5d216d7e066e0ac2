use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::sync::{broadcast, OwnedMutexGuard};
use tracing::{debug, info, warn};

use super::{validate_name, PlaylistError};
use crate::db::{Database, DbPlaylist, DbPlaylistTrack, FAVORITES_PLAYLIST};
use crate::filter::text_matches;
use crate::source::{ChangeEvent, ChangeStream, RecordSource, Resource};

type PlaylistLocks = Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>;

/// Playlist persistence on top of the playlist store
///
/// Handles:
/// - Name validation and uniqueness for create/rename
/// - `(playlist, uri)` uniqueness and play order clamping for members
/// - The favorites playlist, created once when the manager starts
///
/// Membership writes are serialized per playlist; different playlists never
/// wait on each other.
#[derive(Clone)]
pub struct PlaylistManager {
    database: Database,
    source: Arc<dyn RecordSource>,
    locks: PlaylistLocks,
    changes: broadcast::Sender<ChangeEvent>,
    favorites_id: i64,
}

impl PlaylistManager {
    /// Create the manager, making sure the favorites playlist exists
    pub async fn new(
        database: Database,
        source: Arc<dyn RecordSource>,
    ) -> Result<Self, PlaylistError> {
        let favorites_id = ensure_exists(&database, FAVORITES_PLAYLIST).await?;
        let (changes, _) = broadcast::channel(64);
        info!("Playlist store ready, favorites playlist {}", favorites_id);

        Ok(PlaylistManager {
            database,
            source,
            locks: Arc::new(Mutex::new(HashMap::new())),
            changes,
            favorites_id,
        })
    }

    /// Get or create a playlist by exact name, bypassing name validation.
    ///
    /// Used for reserved playlists. Idempotent.
    pub async fn ensure_exists(&self, name: &str) -> Result<i64, PlaylistError> {
        let id = ensure_exists(&self.database, name).await?;
        Ok(id)
    }

    pub fn favorites_id(&self) -> i64 {
        self.favorites_id
    }

    /// Subscribe to playlist changes; fires after every successful write
    pub fn observe(&self) -> ChangeStream {
        self.changes.subscribe()
    }

    pub async fn create(&self, name: &str, description: &str) -> Result<i64, PlaylistError> {
        validate_name(name)?;

        if self.database.get_playlist_id(name).await?.is_some() {
            return Err(PlaylistError::Conflict(format!("playlist '{}'", name)));
        }

        let id = self
            .database
            .insert_playlist(name, description, Utc::now())
            .await
            .map_err(|e| conflict_on_unique(e, format!("playlist '{}'", name)))?;

        info!("Created playlist '{}' ({})", name, id);
        self.notify_changed();
        Ok(id)
    }

    /// Rename a playlist, keeping its description
    pub async fn rename(&self, playlist_id: i64, new_name: &str) -> Result<DbPlaylist, PlaylistError> {
        let playlist = self.require(playlist_id).await?;
        self.edit(playlist_id, new_name, &playlist.description).await
    }

    /// Change name and description, bumping the modification time
    pub async fn edit(
        &self,
        playlist_id: i64,
        name: &str,
        description: &str,
    ) -> Result<DbPlaylist, PlaylistError> {
        validate_name(name)?;

        let playlist = self.require(playlist_id).await?;
        if playlist.is_favorites() {
            return Err(PlaylistError::Validation(
                "the favorites playlist cannot be renamed".to_string(),
            ));
        }

        match self.database.get_playlist_id(name).await? {
            Some(other) if other != playlist_id => {
                return Err(PlaylistError::Conflict(format!("playlist '{}'", name)));
            }
            _ => {}
        }

        self.database
            .update_playlist(playlist_id, name, description, Utc::now())
            .await
            .map_err(|e| conflict_on_unique(e, format!("playlist '{}'", name)))?;

        info!("Renamed playlist '{}' to '{}'", playlist.name, name);
        self.notify_changed();
        self.require(playlist_id).await
    }

    /// Delete a playlist with all of its members
    pub async fn delete(&self, playlist_id: i64) -> Result<(), PlaylistError> {
        let (_guard, playlist) = self.lock_existing(playlist_id).await?;
        if playlist.is_favorites() {
            return Err(PlaylistError::Validation(
                "the favorites playlist cannot be deleted".to_string(),
            ));
        }

        self.database.delete_playlist(playlist_id).await?;
        self.forget_lock(playlist_id);

        info!("Deleted playlist '{}' ({})", playlist.name, playlist_id);
        self.notify_changed();
        Ok(())
    }

    /// Add a member. Fails if the uri is already in the playlist.
    ///
    /// Returns the stored row, with its order clamped into `[0, last + 1]`.
    pub async fn insert(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        let (_guard, _) = self.lock_existing(track.playlist_id).await?;
        let stored = self.insert_locked(track).await?;
        self.notify_changed();
        Ok(stored)
    }

    /// Rewrite an existing member. Fails if the uri is not in the playlist.
    pub async fn update(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        let (_guard, _) = self.lock_existing(track.playlist_id).await?;
        let stored = self.update_locked(track).await?;
        self.notify_changed();
        Ok(stored)
    }

    /// Update when the member exists, insert otherwise
    pub async fn upsert(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        let (_guard, _) = self.lock_existing(track.playlist_id).await?;
        let stored = self.upsert_locked(track).await?;
        self.notify_changed();
        Ok(stored)
    }

    /// Upsert `tracks` at the end of the playlist, in the given order.
    ///
    /// Orders are `last + 1, last + 2, ...`, assigned under one lock. Returns how
    /// many rows were written; individual failures are logged and skipped.
    pub async fn append(
        &self,
        playlist_id: i64,
        tracks: Vec<DbPlaylistTrack>,
    ) -> Result<usize, PlaylistError> {
        let (_guard, _) = self.lock_existing(playlist_id).await?;

        let mut next = self.database.last_play_order(playlist_id).await?.unwrap_or(-1) + 1;
        let mut written = 0;
        for track in tracks {
            let track = track.for_playlist(playlist_id).with_order(next);
            let uri = track.uri.clone();
            match self.upsert_locked(track).await {
                Ok(_) => {
                    written += 1;
                    next += 1;
                }
                Err(e) => warn!("Failed to add {} to playlist {}: {}", uri, playlist_id, e),
            }
        }

        debug!("Appended {} tracks to playlist {}", written, playlist_id);
        if written > 0 {
            self.notify_changed();
        }
        Ok(written)
    }

    /// Remove one member
    pub async fn remove(&self, playlist_id: i64, uri: &str) -> Result<(), PlaylistError> {
        let (_guard, _) = self.lock_existing(playlist_id).await?;
        self.remove_locked(playlist_id, uri).await?;
        self.notify_changed();
        Ok(())
    }

    /// Remove one member of the playlist called `name`
    pub async fn remove_by_name(&self, name: &str, uri: &str) -> Result<(), PlaylistError> {
        let playlist_id = self
            .database
            .get_playlist_id(name)
            .await?
            .ok_or_else(|| PlaylistError::NotFound(format!("playlist '{}'", name)))?;
        self.remove(playlist_id, uri).await
    }

    /// Flip an audio's favorite status. Returns whether it is a favorite now.
    pub async fn toggle_favorite(&self, audio_id: i64) -> Result<bool, PlaylistError> {
        let audio = self
            .source
            .find_audio(audio_id)
            .await?
            .ok_or_else(|| PlaylistError::NotFound(format!("audio {}", audio_id)))?;
        let uri = audio.uri();

        let _guard = self.lock(self.favorites_id).await;
        let favorite = if self.database.member_exists(self.favorites_id, &uri).await? {
            self.remove_locked(self.favorites_id, &uri).await?;
            false
        } else {
            self.insert_locked(DbPlaylistTrack::from_audio(self.favorites_id, &audio))
                .await?;
            true
        };

        debug!("Audio {} favorite: {}", audio_id, favorite);
        self.notify_changed();
        Ok(favorite)
    }

    /// Highest play order in the playlist, None when empty
    pub async fn last_play_order(&self, playlist_id: i64) -> Result<Option<i64>, PlaylistError> {
        Ok(self.database.last_play_order(playlist_id).await?)
    }

    pub async fn get(&self, playlist_id: i64) -> Result<Option<DbPlaylist>, PlaylistError> {
        Ok(self.database.get_playlist(playlist_id).await?)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<DbPlaylist>, PlaylistError> {
        Ok(self.database.get_playlist_by_name(name).await?)
    }

    pub async fn exists(&self, name: &str) -> Result<bool, PlaylistError> {
        Ok(self.database.get_playlist_id(name).await?.is_some())
    }

    pub async fn contains(&self, playlist_id: i64, uri: &str) -> Result<bool, PlaylistError> {
        Ok(self.database.member_exists(playlist_id, uri).await?)
    }

    pub async fn is_favorite(&self, uri: &str) -> Result<bool, PlaylistError> {
        self.contains(self.favorites_id, uri).await
    }

    /// Members in play order whose title contains `query`
    pub async fn tracks(
        &self,
        playlist_id: i64,
        query: Option<&str>,
    ) -> Result<Vec<DbPlaylistTrack>, PlaylistError> {
        let mut tracks = self.database.get_members(playlist_id).await?;
        tracks.retain(|t| text_matches(query, &t.title));
        Ok(tracks)
    }

    /// Public playlists whose name contains `query`, by name
    pub async fn playlists(&self, query: Option<&str>) -> Result<Vec<DbPlaylist>, PlaylistError> {
        let mut playlists = self.database.get_playlists().await?;
        playlists.retain(|p| !p.is_private() && text_matches(query, &p.name));
        Ok(playlists)
    }

    pub async fn favorite_uris(&self) -> Result<Vec<String>, PlaylistError> {
        Ok(self.database.get_member_uris(self.favorites_id).await?)
    }

    pub async fn count(&self, playlist_id: i64) -> Result<i64, PlaylistError> {
        Ok(self.database.count_members(playlist_id).await?)
    }

    async fn require(&self, playlist_id: i64) -> Result<DbPlaylist, PlaylistError> {
        self.database
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| PlaylistError::NotFound(format!("playlist {}", playlist_id)))
    }

    /// Lock the playlist, then check it still exists
    async fn lock_existing(
        &self,
        playlist_id: i64,
    ) -> Result<(OwnedMutexGuard<()>, DbPlaylist), PlaylistError> {
        let guard = self.lock(playlist_id).await;
        match self.require(playlist_id).await {
            Ok(playlist) => Ok((guard, playlist)),
            Err(e) => {
                drop(guard);
                if matches!(e, PlaylistError::NotFound(_)) {
                    self.forget_lock(playlist_id);
                }
                Err(e)
            }
        }
    }

    fn forget_lock(&self, playlist_id: i64) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&playlist_id);
    }

    async fn lock(&self, playlist_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(playlist_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    async fn clamp_order(&self, mut track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        let next = self
            .database
            .last_play_order(track.playlist_id)
            .await?
            .unwrap_or(-1)
            + 1;
        if track.order < 0 || track.order > next {
            track.order = next;
        }
        Ok(track)
    }

    async fn insert_locked(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        if self
            .database
            .member_exists(track.playlist_id, &track.uri)
            .await?
        {
            return Err(PlaylistError::Conflict(format!(
                "{} in playlist {}",
                track.uri, track.playlist_id
            )));
        }

        let track = self.clamp_order(track).await?;
        self.database
            .insert_member(&track)
            .await
            .map_err(|e| conflict_on_unique(e, format!("{} in playlist {}", track.uri, track.playlist_id)))?;
        self.database
            .touch_playlist(track.playlist_id, Utc::now())
            .await?;
        Ok(track)
    }

    async fn update_locked(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        if !self
            .database
            .member_exists(track.playlist_id, &track.uri)
            .await?
        {
            return Err(PlaylistError::NotFound(format!(
                "{} in playlist {}",
                track.uri, track.playlist_id
            )));
        }

        let track = self.clamp_order(track).await?;
        self.database.update_member(&track).await?;
        self.database
            .touch_playlist(track.playlist_id, Utc::now())
            .await?;
        Ok(track)
    }

    async fn upsert_locked(&self, track: DbPlaylistTrack) -> Result<DbPlaylistTrack, PlaylistError> {
        if self
            .database
            .member_exists(track.playlist_id, &track.uri)
            .await?
        {
            self.update_locked(track).await
        } else {
            self.insert_locked(track).await
        }
    }

    async fn remove_locked(&self, playlist_id: i64, uri: &str) -> Result<(), PlaylistError> {
        let removed = self.database.delete_member(playlist_id, uri).await?;
        if removed == 0 {
            return Err(PlaylistError::NotFound(format!(
                "{} in playlist {}",
                uri, playlist_id
            )));
        }
        self.database.touch_playlist(playlist_id, Utc::now()).await?;
        Ok(())
    }

    fn notify_changed(&self) {
        // No subscribers is fine
        let _ = self.changes.send(ChangeEvent {
            resource: Resource::Playlists,
        });
    }
}

async fn ensure_exists(database: &Database, name: &str) -> Result<i64, sqlx::Error> {
    if let Some(id) = database.get_playlist_id(name).await? {
        return Ok(id);
    }

    match database.insert_playlist(name, "", Utc::now()).await {
        Ok(id) => {
            info!("Created playlist '{}' ({})", name, id);
            Ok(id)
        }
        // Lost a race with another opener
        Err(e) if is_unique_violation(&e) => database
            .get_playlist_id(name)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
        Err(e) => Err(e),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

fn conflict_on_unique(err: sqlx::Error, what: String) -> PlaylistError {
    if is_unique_violation(&err) {
        PlaylistError::Conflict(what)
    } else {
        PlaylistError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_audio, MemorySource};

    async fn setup() -> (PlaylistManager, Arc<MemorySource>) {
        let source = Arc::new(MemorySource::new());
        let database = Database::new_in_memory().await.unwrap();
        let manager = PlaylistManager::new(database, source.clone()).await.unwrap();
        (manager, source)
    }

    fn track(playlist_id: i64, n: i64, order: i64) -> DbPlaylistTrack {
        DbPlaylistTrack::new(
            playlist_id,
            &format!("media://audio/{}", n),
            &format!("Track {}", n),
            "Artist",
            "Album",
        )
        .with_order(order)
    }

    #[tokio::test]
    async fn test_favorites_created_once() {
        let (manager, _) = setup().await;
        let again = manager.ensure_exists(FAVORITES_PLAYLIST).await.unwrap();
        assert_eq!(again, manager.favorites_id());

        // Hidden from the public listing
        assert!(manager.playlists(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate_names() {
        let (manager, _) = setup().await;
        assert!(matches!(
            manager.create("Trip!", "").await,
            Err(PlaylistError::Validation(_))
        ));

        let id = manager.create("Chill", "").await.unwrap();
        assert!(id > 0);
        assert!(matches!(
            manager.create("Chill", "").await,
            Err(PlaylistError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let (manager, _) = setup().await;
        let id = manager.create("Chill", "slow stuff").await.unwrap();
        let renamed = manager.rename(id, "Chill").await.unwrap();
        assert_eq!(renamed.name, "Chill");
        assert_eq!(renamed.description, "slow stuff");
    }

    #[tokio::test]
    async fn test_rename_conflicts_with_other_playlist() {
        let (manager, _) = setup().await;
        manager.create("Chill", "").await.unwrap();
        let id = manager.create("Party", "").await.unwrap();
        assert!(matches!(
            manager.rename(id, "Chill").await,
            Err(PlaylistError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_favorites_cannot_be_deleted_or_renamed() {
        let (manager, _) = setup().await;
        let favorites = manager.favorites_id();
        assert!(manager.delete(favorites).await.is_err());
        assert!(manager.rename(favorites, "Loved").await.is_err());
        assert!(manager.get(favorites).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_clamps_order() {
        let (manager, _) = setup().await;
        let id = manager.create("Mix", "").await.unwrap();
        manager.insert(track(id, 1, 0)).await.unwrap();
        manager.insert(track(id, 2, 1)).await.unwrap();

        // last is 1, so 50 clamps to 2
        let stored = manager.update(track(id, 1, 50)).await.unwrap();
        assert_eq!(stored.order, 2);

        let stored = manager.update(track(id, 2, 0)).await.unwrap();
        assert_eq!(stored.order, 0);
    }

    #[tokio::test]
    async fn test_upsert_routes_by_existence() {
        let (manager, _) = setup().await;
        let id = manager.create("Mix", "").await.unwrap();

        manager.upsert(track(id, 1, -1)).await.unwrap();
        let mut changed = track(id, 1, 0);
        changed.title = "Renamed".to_string();
        manager.upsert(changed).await.unwrap();

        let tracks = manager.tracks(id, None).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Renamed");
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_orders() {
        let (manager, _) = setup().await;
        let id = manager.create("Mix", "").await.unwrap();
        manager.insert(track(id, 1, 0)).await.unwrap();

        let written = manager
            .append(id, vec![track(0, 2, -1), track(0, 3, -1), track(0, 4, -1)])
            .await
            .unwrap();
        assert_eq!(written, 3);

        let orders: Vec<(String, i64)> = manager
            .tracks(id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.uri, t.order))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("media://audio/1".to_string(), 0),
                ("media://audio/2".to_string(), 1),
                ("media://audio/3".to_string(), 2),
                ("media://audio/4".to_string(), 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_orders() {
        let (manager, _) = setup().await;
        let id = manager.create("Busy", "").await.unwrap();

        let mut handles = Vec::new();
        for n in 0..16 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move {
                manager.insert(track(id, n, -1)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut orders: Vec<i64> = manager
            .tracks(id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.order)
            .collect();
        orders.sort();
        assert_eq!(orders, (0..16).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_toggle_favorite_unknown_audio() {
        let (manager, _) = setup().await;
        assert!(matches!(
            manager.toggle_favorite(404).await,
            Err(PlaylistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_favorite_stores_audio_metadata() {
        let (manager, source) = setup().await;
        source.put_audio(sample_audio(7, "Heart", "/music/heart.mp3", 200_000));

        assert!(manager.toggle_favorite(7).await.unwrap());
        let favorites = manager.tracks(manager.favorites_id(), None).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].title, "Heart");
        assert_eq!(favorites[0].order, 0);
        assert!(manager.is_favorite("media://audio/7").await.unwrap());
    }

    #[tokio::test]
    async fn test_writes_broadcast_playlist_changes() {
        let (manager, _) = setup().await;
        let mut changes = manager.observe();

        manager.create("Mix", "").await.unwrap();
        let event = changes.recv().await.unwrap();
        assert_eq!(event.resource, Resource::Playlists);
    }

    #[tokio::test]
    async fn test_remove_by_unknown_name_fails_closed() {
        let (manager, _) = setup().await;
        assert!(matches!(
            manager.remove_by_name("Nope", "media://audio/1").await,
            Err(PlaylistError::NotFound(_))
        ));
    }

    /// Push the playlist's modification time a day back and return it
    async fn backdate(manager: &PlaylistManager, id: i64) -> chrono::DateTime<Utc> {
        let old = Utc::now() - chrono::Duration::days(1);
        manager.database.touch_playlist(id, old).await.unwrap();
        manager.get(id).await.unwrap().unwrap().date_modified
    }

    async fn modified(manager: &PlaylistManager, id: i64) -> chrono::DateTime<Utc> {
        manager.get(id).await.unwrap().unwrap().date_modified
    }

    #[tokio::test]
    async fn test_member_writes_bump_date_modified() {
        let (manager, _) = setup().await;
        let id = manager.create("Dated", "").await.unwrap();
        let created = manager.get(id).await.unwrap().unwrap().date_created;

        let before = backdate(&manager, id).await;
        manager.insert(track(id, 1, -1)).await.unwrap();
        assert!(modified(&manager, id).await > before);

        let before = backdate(&manager, id).await;
        manager.update(track(id, 1, 0)).await.unwrap();
        assert!(modified(&manager, id).await > before);

        let before = backdate(&manager, id).await;
        manager.upsert(track(id, 2, -1)).await.unwrap();
        assert!(modified(&manager, id).await > before);

        let before = backdate(&manager, id).await;
        manager.append(id, vec![track(id, 3, -1)]).await.unwrap();
        assert!(modified(&manager, id).await > before);

        let before = backdate(&manager, id).await;
        manager.remove(id, "media://audio/1").await.unwrap();
        assert!(modified(&manager, id).await > before);

        assert_eq!(manager.get(id).await.unwrap().unwrap().date_created, created);
    }

    #[tokio::test]
    async fn test_rename_bumps_date_modified() {
        let (manager, _) = setup().await;
        let id = manager.create("Before", "").await.unwrap();
        let before = backdate(&manager, id).await;

        let renamed = manager.rename(id, "After").await.unwrap();
        assert!(renamed.date_modified > before);
        assert_eq!(modified(&manager, id).await, renamed.date_modified);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_date_modified() {
        let (manager, _) = setup().await;
        let id = manager.create("Steady", "").await.unwrap();
        manager.insert(track(id, 1, 0)).await.unwrap();

        let before = backdate(&manager, id).await;
        assert!(manager.insert(track(id, 1, 0)).await.is_err());
        assert!(manager.remove(id, "media://audio/9").await.is_err());
        assert_eq!(modified(&manager, id).await, before);
    }

    #[tokio::test]
    async fn test_writes_to_unknown_playlist_are_not_found() {
        let (manager, _) = setup().await;
        let id = manager.create("Gone", "").await.unwrap();
        manager.delete(id).await.unwrap();

        assert!(matches!(
            manager.insert(track(id, 1, -1)).await,
            Err(PlaylistError::NotFound(_))
        ));
        assert!(matches!(
            manager.remove(999, "media://audio/1").await,
            Err(PlaylistError::NotFound(_))
        ));

        let locks = manager.locks.lock().unwrap();
        assert!(!locks.contains_key(&id));
        assert!(!locks.contains_key(&999));
    }

    #[tokio::test]
    async fn test_insert_racing_delete_is_ok_or_not_found() {
        let (manager, _) = setup().await;
        for n in 0..8 {
            let id = manager.create(&format!("Race {}", n), "").await.unwrap();
            let deleting = {
                let manager = manager.clone();
                tokio::spawn(async move { manager.delete(id).await })
            };
            let inserting = {
                let manager = manager.clone();
                tokio::spawn(async move { manager.insert(track(id, n, -1)).await })
            };

            deleting.await.unwrap().unwrap();
            match inserting.await.unwrap() {
                Ok(_) | Err(PlaylistError::NotFound(_)) => {}
                Err(e) => panic!("unexpected error {:?}", e),
            }
            assert_eq!(manager.count(id).await.unwrap(), 0);
        }
    }
}
