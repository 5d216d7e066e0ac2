mod manager;
mod validation;

pub use manager::PlaylistManager;
pub use validation::validate_name;

use thiserror::Error;

use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("Invalid playlist name: {0}")]
    Validation(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Store failures surface to lists as query failures
impl From<PlaylistError> for SourceError {
    fn from(err: PlaylistError) -> Self {
        SourceError::Query(err.to_string())
    }
}
