use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::db::models::*;

const PLAYLIST_COLUMNS: &str = r#"
    p.playlist_id, p.name, p.description, p.date_created, p.date_modified,
    (SELECT COUNT(*) FROM playlist_members m WHERE m.playlist_id = p.playlist_id) AS track_count,
    (SELECT m.artwork_uri FROM playlist_members m WHERE m.playlist_id = p.playlist_id
        ORDER BY m.play_order DESC LIMIT 1) AS artwork
"#;

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the playlist store at `database_path`
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        // Use sqlite:// with ?mode=rwc to create if it doesn't exist
        let database_url = format!("sqlite://{}?mode=rwc", database_path);
        info!("Connecting to {}", database_url);
        let pool = SqlitePool::connect(&database_url).await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Private in-memory store; one connection so every query sees the same data
    pub async fn new_in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlists (
                playlist_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                date_created TEXT NOT NULL,
                date_modified TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One row per (playlist, uri); play_order is a rank, not a position
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlist_members (
                playlist_id INTEGER NOT NULL,
                uri TEXT NOT NULL,
                play_order INTEGER NOT NULL,
                title TEXT NOT NULL,
                artist TEXT NOT NULL,
                album TEXT NOT NULL,
                artwork_uri TEXT,
                mime_type TEXT,
                PRIMARY KEY (playlist_id, uri),
                FOREIGN KEY (playlist_id) REFERENCES playlists (playlist_id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_playlist_members_order
            ON playlist_members (playlist_id, play_order)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a playlist row and return its id
    pub async fn insert_playlist(
        &self,
        name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO playlists (name, description, date_created, date_modified)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_playlist(&self, playlist_id: i64) -> Result<Option<DbPlaylist>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM playlists p WHERE p.playlist_id = ?",
            PLAYLIST_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(playlist_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| playlist_from_row(&row)).transpose()
    }

    pub async fn get_playlist_by_name(&self, name: &str) -> Result<Option<DbPlaylist>, sqlx::Error> {
        let sql = format!("SELECT {} FROM playlists p WHERE p.name = ?", PLAYLIST_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| playlist_from_row(&row)).transpose()
    }

    pub async fn get_playlist_id(&self, name: &str) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query("SELECT playlist_id FROM playlists WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("playlist_id")))
    }

    /// Every playlist, private ones included, by name
    pub async fn get_playlists(&self) -> Result<Vec<DbPlaylist>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM playlists p ORDER BY p.name COLLATE NOCASE",
            PLAYLIST_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(playlist_from_row).collect()
    }

    /// Rename / re-describe a playlist. Returns rows affected.
    pub async fn update_playlist(
        &self,
        playlist_id: i64,
        name: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE playlists SET name = ?, description = ?, date_modified = ?
            WHERE playlist_id = ?
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(now.to_rfc3339())
        .bind(playlist_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn touch_playlist(&self, playlist_id: i64, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE playlists SET date_modified = ? WHERE playlist_id = ?")
            .bind(now.to_rfc3339())
            .bind(playlist_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete a playlist and all of its membership rows in one transaction
    pub async fn delete_playlist(&self, playlist_id: i64) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM playlist_members WHERE playlist_id = ?")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM playlists WHERE playlist_id = ?")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    pub async fn member_exists(&self, playlist_id: i64, uri: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM playlist_members WHERE playlist_id = ? AND uri = ?")
            .bind(playlist_id)
            .bind(uri)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Members in play order
    pub async fn get_members(&self, playlist_id: i64) -> Result<Vec<DbPlaylistTrack>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM playlist_members WHERE playlist_id = ? ORDER BY play_order ASC",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    pub async fn get_member_uris(&self, playlist_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT uri FROM playlist_members WHERE playlist_id = ? ORDER BY play_order ASC",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("uri")).collect())
    }

    /// Highest play order in the playlist, or None when it is empty
    pub async fn last_play_order(&self, playlist_id: i64) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT MAX(play_order) AS last_order FROM playlist_members WHERE playlist_id = ?",
        )
        .bind(playlist_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_get("last_order")
    }

    pub async fn count_members(&self, playlist_id: i64) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM playlist_members WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(&self.pool)
            .await?;

        row.try_get("count")
    }

    /// Plain INSERT; a duplicate (playlist_id, uri) is a constraint error
    pub async fn insert_member(&self, track: &DbPlaylistTrack) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO playlist_members (
                playlist_id, uri, play_order, title, artist, album, artwork_uri, mime_type
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(track.playlist_id)
        .bind(&track.uri)
        .bind(track.order)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album)
        .bind(&track.artwork)
        .bind(&track.mime_type)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_member(&self, track: &DbPlaylistTrack) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE playlist_members
            SET play_order = ?, title = ?, artist = ?, album = ?, artwork_uri = ?, mime_type = ?
            WHERE playlist_id = ? AND uri = ?
            "#,
        )
        .bind(track.order)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album)
        .bind(&track.artwork)
        .bind(&track.mime_type)
        .bind(track.playlist_id)
        .bind(&track.uri)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_member(&self, playlist_id: i64, uri: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM playlist_members WHERE playlist_id = ? AND uri = ?")
            .bind(playlist_id)
            .bind(uri)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn get_preference(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    pub async fn set_preference(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn playlist_from_row(row: &SqliteRow) -> Result<DbPlaylist, sqlx::Error> {
    Ok(DbPlaylist {
        id: row.try_get("playlist_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        date_created: parse_timestamp(&row.try_get::<String, _>("date_created")?)?,
        date_modified: parse_timestamp(&row.try_get::<String, _>("date_modified")?)?,
        track_count: row.try_get("track_count")?,
        artwork: row.try_get("artwork")?,
    })
}

fn member_from_row(row: &SqliteRow) -> DbPlaylistTrack {
    DbPlaylistTrack {
        playlist_id: row.get("playlist_id"),
        uri: row.get("uri"),
        order: row.get("play_order"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        artwork: row.get("artwork_uri"),
        mime_type: row.get("mime_type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_tables_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("playlists.db");
        let path = db_path.to_str().unwrap();

        let db = Database::new(path).await.unwrap();
        let id = db.insert_playlist("Road Trip", "", Utc::now()).await.unwrap();
        drop(db);

        let db = Database::new(path).await.unwrap();
        let playlist = db.get_playlist(id).await.unwrap().unwrap();
        assert_eq!(playlist.name, "Road Trip");
        assert_eq!(playlist.track_count, 0);
        assert_eq!(playlist.artwork, None);
    }

    #[tokio::test]
    async fn test_last_play_order_empty_is_none() {
        let db = Database::new_in_memory().await.unwrap();
        let id = db.insert_playlist("Empty", "", Utc::now()).await.unwrap();
        assert_eq!(db.last_play_order(id).await.unwrap(), None);

        let track = DbPlaylistTrack::new(id, "media://audio/1", "A", "B", "C").with_order(4);
        db.insert_member(&track).await.unwrap();
        assert_eq!(db.last_play_order(id).await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_duplicate_member_is_rejected_by_store() {
        let db = Database::new_in_memory().await.unwrap();
        let id = db.insert_playlist("Dupes", "", Utc::now()).await.unwrap();
        let track = DbPlaylistTrack::new(id, "media://audio/1", "A", "B", "C").with_order(0);

        db.insert_member(&track).await.unwrap();
        let err = db.insert_member(&track).await.unwrap_err();
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique);
    }

    #[tokio::test]
    async fn test_playlists_listed_by_name_ignoring_case() {
        let db = Database::new_in_memory().await.unwrap();
        db.insert_playlist(FAVORITES_PLAYLIST, "", Utc::now()).await.unwrap();
        db.insert_playlist("Morning", "", Utc::now()).await.unwrap();
        db.insert_playlist("evening", "", Utc::now()).await.unwrap();

        let names: Vec<String> = db
            .get_playlists()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec![FAVORITES_PLAYLIST, "evening", "Morning"]);
    }

    #[tokio::test]
    async fn test_playlist_artwork_is_last_member() {
        let db = Database::new_in_memory().await.unwrap();
        let id = db.insert_playlist("Art", "", Utc::now()).await.unwrap();

        let mut first = DbPlaylistTrack::new(id, "media://audio/1", "A", "B", "C").with_order(0);
        first.artwork = Some("media://albumart/1".to_string());
        let mut second = DbPlaylistTrack::new(id, "media://audio/2", "D", "E", "F").with_order(1);
        second.artwork = Some("media://albumart/2".to_string());
        db.insert_member(&first).await.unwrap();
        db.insert_member(&second).await.unwrap();

        let playlist = db.get_playlist(id).await.unwrap().unwrap();
        assert_eq!(playlist.track_count, 2);
        assert_eq!(playlist.artwork.as_deref(), Some("media://albumart/2"));
    }

    #[tokio::test]
    async fn test_delete_playlist_removes_members() {
        let db = Database::new_in_memory().await.unwrap();
        let id = db.insert_playlist("Gone", "", Utc::now()).await.unwrap();
        let track = DbPlaylistTrack::new(id, "media://audio/1", "A", "B", "C").with_order(0);
        db.insert_member(&track).await.unwrap();

        assert_eq!(db.delete_playlist(id).await.unwrap(), 1);
        assert!(db.get_playlist(id).await.unwrap().is_none());
        assert_eq!(db.count_members(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_preferences_upsert() {
        let db = Database::new_in_memory().await.unwrap();
        assert_eq!(db.get_preference("k").await.unwrap(), None);
        db.set_preference("k", "1").await.unwrap();
        db.set_preference("k", "2").await.unwrap();
        assert_eq!(db.get_preference("k").await.unwrap().as_deref(), Some("2"));
    }
}
