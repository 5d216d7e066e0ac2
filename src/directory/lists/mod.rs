mod audios;
mod catalog;
mod playlists;

pub use audios::AudiosList;
pub use catalog::{AlbumsList, ArtistsList, FoldersList, GenresList};
pub use playlists::{MembersList, PlaylistsList};
