use thiserror::Error;
use tracing::debug;

use crate::db::Database;
use crate::filter::Filter;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remembers each list's last filter across sessions
#[derive(Debug, Clone)]
pub struct FilterStore {
    database: Database,
}

impl FilterStore {
    pub fn new(database: Database) -> Self {
        FilterStore { database }
    }

    pub async fn load(&self, list: &str) -> Result<Option<Filter>, PreferenceError> {
        let Some(value) = self.database.get_preference(&preference_key(list)).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&value)?))
    }

    pub async fn save(&self, list: &str, filter: &Filter) -> Result<(), PreferenceError> {
        let value = serde_json::to_string(filter)?;
        self.database
            .set_preference(&preference_key(list), &value)
            .await?;
        debug!("Saved filter for {}: {}", list, value);
        Ok(())
    }
}

fn preference_key(list: &str) -> String {
    format!("filter.{}", list)
}
