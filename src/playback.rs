use serde::{Deserialize, Serialize};

use crate::db::DbPlaylistTrack;
use crate::source::Audio;

/// What the player needs to queue an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableRef {
    pub uri: String,
    pub title: String,
    pub subtitle: String,
    pub artwork: Option<String>,
    pub mime_type: Option<String>,
}

/// Records that can be handed to the player
pub trait Playable {
    fn playable(&self) -> PlayableRef;
}

impl Playable for Audio {
    fn playable(&self) -> PlayableRef {
        PlayableRef {
            uri: self.uri(),
            title: self.title.clone(),
            subtitle: self.artist.clone(),
            artwork: Some(self.artwork_uri()),
            mime_type: self.mime_type.clone(),
        }
    }
}

impl Playable for DbPlaylistTrack {
    fn playable(&self) -> PlayableRef {
        PlayableRef {
            uri: self.uri.clone(),
            title: self.title.clone(),
            subtitle: self.artist.clone(),
            artwork: self.artwork.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Handle to the playback service
#[async_trait::async_trait]
pub trait Remote: Send + Sync {
    /// Replace the queue with `items` and start at `start_index`
    async fn request_play(&self, shuffle: bool, start_index: usize, items: Vec<PlayableRef>);

    /// Jump to `uri` if it is already queued. Returns false when it is not.
    async fn seek_to(&self, uri: &str) -> bool;

    /// Queue position right after the current item
    async fn next_queue_index(&self) -> usize;

    /// Insert into the queue at `index` (end when None). Returns how many were added.
    async fn add(&self, items: Vec<PlayableRef>, index: Option<usize>) -> usize;
}
