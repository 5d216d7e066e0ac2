use std::sync::Arc;

use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::db::PlaylistEntry;
use crate::directory::lists::{MembersList, PlaylistsList};
use crate::directory::{Directory, DirectorySource};
use crate::notify::{Icon, Notifier, Toast, ToastDuration, UserAction};
use crate::playback::{Playable, PlayableRef, Remote};
use crate::playlists::{PlaylistError, PlaylistManager};
use crate::source::Record;

/// User commands issued from lists, routed to the playlist store or the player.
///
/// Every outcome the user should know about becomes a toast; nothing here
/// returns an error.
#[derive(Clone)]
pub struct Commands {
    manager: PlaylistManager,
    remote: Arc<dyn Remote>,
    notifier: Arc<dyn Notifier>,
}

impl Commands {
    pub fn new(
        manager: PlaylistManager,
        remote: Arc<dyn Remote>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Commands {
            manager,
            remote,
            notifier,
        }
    }

    /// Play the selection (or the whole list), consuming the selection.
    ///
    /// Starts at a random item when shuffling, else at the focused item.
    pub async fn play<S>(&self, directory: &mut Directory<S>, shuffle: bool) -> bool
    where
        S: DirectorySource,
        S::Item: Playable,
    {
        let selected = directory.selected_items();
        let items = if selected.is_empty() {
            directory.items()
        } else {
            selected
        };
        if items.is_empty() {
            self.toast(Toast::warning("Nothing to play")).await;
            return false;
        }

        let focused = directory
            .selection()
            .focused()
            .and_then(|key| items.iter().position(|item| item.key() == key));
        directory.clear();

        let start_index = if shuffle {
            rand::thread_rng().gen_range(0..items.len())
        } else {
            focused.unwrap_or(0)
        };

        let refs: Vec<PlayableRef> = items.iter().map(Playable::playable).collect();
        let count = refs.len();
        info!("Playing {} items from {}", count, start_index);
        self.remote.request_play(shuffle, start_index, refs).await;
        self.toast(Toast::new(format!("Playing {} tracks", count)).icon(Icon::Play))
            .await;
        true
    }

    /// Jump to `item` if it is queued, otherwise play it alone
    pub async fn open<T: Playable>(&self, item: &T) {
        let playable = item.playable();
        if self.remote.seek_to(&playable.uri).await {
            debug!("{} already queued", playable.uri);
            return;
        }
        self.remote.request_play(false, 0, vec![playable]).await;
    }

    /// Append the selection (or focused item) to the playlist called `name`
    pub async fn add_to_playlist<S>(&self, directory: &mut Directory<S>, name: &str) -> usize
    where
        S: DirectorySource,
        S::Item: PlaylistEntry,
    {
        let targets = directory.targets();
        if targets.is_empty() {
            self.toast(Toast::warning("No item selected")).await;
            return 0;
        }
        directory.clear();

        let playlist = match self.manager.get_by_name(name).await {
            Ok(Some(playlist)) => playlist,
            Ok(None) => {
                self.toast(Toast::error(format!("Playlist {} not found", name)))
                    .await;
                return 0;
            }
            Err(e) => {
                self.report(&e).await;
                return 0;
            }
        };

        let total = targets.len();
        let tracks = targets.iter().map(|t| t.to_track(playlist.id)).collect();
        match self.manager.append(playlist.id, tracks).await {
            Ok(added) if added == total => {
                self.toast(
                    Toast::new(format!("Added {} tracks to {}", added, name)).icon(Icon::Playlist),
                )
                .await;
                added
            }
            Ok(added) => {
                warn!("Only {} of {} tracks added to {}", added, total, name);
                self.toast(Toast::warning(format!(
                    "Added only {} of {} tracks to {}",
                    added, total, name
                )))
                .await;
                added
            }
            Err(e) => {
                self.report(&e).await;
                0
            }
        }
    }

    /// Queue the selection (or focused item) at `index`, or at the end
    pub async fn add_to_queue<S>(&self, directory: &mut Directory<S>, index: Option<usize>) -> usize
    where
        S: DirectorySource,
        S::Item: Playable,
    {
        let targets = directory.targets();
        if targets.is_empty() {
            self.toast(Toast::warning("No item selected")).await;
            return 0;
        }
        directory.clear();

        let refs: Vec<PlayableRef> = targets.iter().map(Playable::playable).collect();
        let added = self.remote.add(refs, index).await;
        self.toast(Toast::new(format!("Added {} tracks to queue", added)).icon(Icon::Queue))
            .await;
        added
    }

    /// Queue right after the current item
    pub async fn play_next<S>(&self, directory: &mut Directory<S>) -> usize
    where
        S: DirectorySource,
        S::Item: Playable,
    {
        let index = self.remote.next_queue_index().await;
        self.add_to_queue(directory, Some(index)).await
    }

    /// Flip favorite status; None when it could not be changed
    pub async fn toggle_favorite(&self, audio_id: i64) -> Option<bool> {
        match self.manager.toggle_favorite(audio_id).await {
            Ok(true) => {
                self.toast(Toast::new("Added to favourites").icon(Icon::Favorite))
                    .await;
                Some(true)
            }
            Ok(false) => {
                self.toast(Toast::new("Removed from favourites").icon(Icon::Favorite))
                    .await;
                Some(false)
            }
            Err(e) => {
                self.report(&e).await;
                None
            }
        }
    }

    /// Remove the selected (or focused) tracks from the listed playlist
    pub async fn delete_members(&self, directory: &mut Directory<MembersList>) -> usize {
        let targets = directory.targets();
        if targets.is_empty() {
            self.toast(Toast::warning("No item selected")).await;
            return 0;
        }
        directory.clear();

        let playlist_id = directory.source().playlist_id();
        let mut removed = 0;
        for track in &targets {
            match self.manager.remove(playlist_id, &track.uri).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove {}: {}", track.uri, e),
            }
        }

        let toast = if removed == targets.len() {
            Toast::new(format!("Removed {} tracks", removed)).icon(Icon::Delete)
        } else {
            Toast::warning(format!("Removed only {} of {} tracks", removed, targets.len()))
        };
        self.toast(toast).await;
        removed
    }

    pub async fn create_playlist(&self, name: &str, description: &str) -> Option<i64> {
        match self.manager.create(name, description).await {
            Ok(id) => {
                self.toast(Toast::new(format!("Playlist {} created", name)).icon(Icon::Playlist))
                    .await;
                Some(id)
            }
            Err(e) => {
                self.report(&e).await;
                None
            }
        }
    }

    pub async fn rename_playlist(&self, playlist_id: i64, name: &str) -> bool {
        match self.manager.rename(playlist_id, name).await {
            Ok(_) => {
                self.toast(Toast::new(format!("Playlist renamed to {}", name)).icon(Icon::Playlist))
                    .await;
                true
            }
            Err(e) => {
                self.report(&e).await;
                false
            }
        }
    }

    /// Delete the selected (or focused) playlists once the user confirms
    pub async fn delete_playlists(&self, directory: &mut Directory<PlaylistsList>) -> usize {
        let targets = directory.targets();
        if targets.is_empty() {
            self.toast(Toast::warning("No item selected")).await;
            return 0;
        }

        let question = match targets.as_slice() {
            [only] => format!("Delete playlist {}?", only.name),
            many => format!("Delete {} playlists?", many.len()),
        };
        let confirm = Toast::warning(question)
            .action("Delete")
            .duration(ToastDuration::Long);
        if self.notifier.notify(confirm).await != UserAction::Performed {
            debug!("Playlist deletion cancelled");
            return 0;
        }
        directory.clear();

        let mut deleted = 0;
        for playlist in &targets {
            match self.manager.delete(playlist.id).await {
                Ok(()) => deleted += 1,
                Err(e) => warn!("Failed to delete playlist {}: {}", playlist.name, e),
            }
        }

        let toast = if deleted == targets.len() {
            Toast::new(format!("Deleted {} playlists", deleted)).icon(Icon::Delete)
        } else {
            Toast::warning(format!(
                "Deleted only {} of {} playlists",
                deleted,
                targets.len()
            ))
        };
        self.toast(toast).await;
        deleted
    }

    async fn report(&self, err: &PlaylistError) {
        let toast = match err {
            PlaylistError::Validation(msg) => Toast::error(msg.clone()).title("Invalid name"),
            PlaylistError::Conflict(what) => Toast::error(format!("{} already exists", what)),
            PlaylistError::NotFound(what) => Toast::error(format!("{} not found", what)),
            PlaylistError::Database(e) => {
                error!("Playlist store failure: {}", e);
                Toast::unknown_error()
            }
            PlaylistError::Source(e) => {
                error!("Record source failure: {}", e);
                Toast::unknown_error()
            }
        };
        self.toast(toast).await;
    }

    async fn toast(&self, toast: Toast) {
        self.notifier.notify(toast).await;
    }
}
