#![allow(dead_code)]

use std::sync::Arc;

use medialib::db::Database;
use medialib::source::Audio;
use medialib::test_support::{sample_audio, MemorySource};
use medialib::PlaylistManager;
use tempfile::TempDir;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Playlist manager over an on-disk store in a temp dir, plus its record source
pub async fn setup_manager() -> (PlaylistManager, Arc<MemorySource>, TempDir) {
    tracing_init();

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("playlists.db");

    let database = Database::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");

    let source = Arc::new(MemorySource::new());
    let manager = PlaylistManager::new(database, source.clone())
        .await
        .expect("Failed to create playlist manager");

    (manager, source, temp_dir)
}

pub fn audio(id: i64, title: &str, artist: &str, album: &str, duration_ms: i64) -> Audio {
    Audio {
        artist: artist.to_string(),
        album: album.to_string(),
        ..sample_audio(id, title, &format!("/music/{}/{}.mp3", artist, id), duration_ms)
    }
}
