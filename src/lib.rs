// Library exports for embedding the media library core and for integration tests

pub mod app_context;
pub mod commands;
pub mod config;
pub mod db;
pub mod directory;
pub mod filter;
pub mod logging;
pub mod notify;
pub mod playback;
pub mod playlists;
pub mod preferences;
pub mod source;

// Test support (unit tests, or integration tests with the test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use app_context::AppContext;
pub use config::Config;
pub use directory::{Directory, GroupedResult};
pub use filter::{Filter, OrderKey};
pub use playlists::{PlaylistError, PlaylistManager};
pub use source::{RecordSource, SourceError};
