use super::selection::SelectionState;
use crate::filter::OrderKey;

/// Operations a list offers on its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Shuffle,
    Share,
    Delete,
    PlaylistAdd,
    Create,
    Edit,
    GoToArtist,
    GoToAlbum,
    Properties,
    SelectAll,
    AddToQueue,
    PlayNext,
}

/// The kinds of browsable lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Tracks; the flags say whether the list is already one artist's or album's
    Audios { by_artist: bool, by_album: bool },
    Artists,
    Albums,
    Genres,
    Folders,
    Playlists,
    /// Tracks of one playlist
    Members,
}

impl ListKind {
    /// Sort keys the list supports, default first
    pub fn orders(&self) -> Vec<OrderKey> {
        match self {
            ListKind::Audios { .. } => vec![
                OrderKey::None,
                OrderKey::Name,
                OrderKey::DateModified,
                OrderKey::Album,
                OrderKey::Artist,
                OrderKey::Length,
            ],
            ListKind::Artists | ListKind::Genres | ListKind::Folders | ListKind::Members => {
                vec![OrderKey::None, OrderKey::Name]
            }
            ListKind::Albums => vec![OrderKey::None, OrderKey::Name, OrderKey::Artist],
            ListKind::Playlists => vec![OrderKey::None, OrderKey::Name, OrderKey::DateModified],
        }
    }

    /// Actions that apply to the list as a whole
    pub fn primary_actions(&self) -> Vec<Action> {
        match self {
            ListKind::Playlists => vec![Action::Create],
            _ => vec![Action::Play, Action::Shuffle],
        }
    }
}

/// Item actions for `kind` under the current selection
pub fn actions(state: &SelectionState, kind: ListKind) -> Vec<Action> {
    let selected = state.len();
    let mut actions = match kind {
        ListKind::Audios { by_artist, by_album } => {
            let mut actions = vec![
                Action::PlaylistAdd,
                Action::PlayNext,
                Action::AddToQueue,
                Action::Delete,
                Action::Share,
            ];
            // Single item affordances disappear for a multi-selection
            if selected < 2 {
                actions.push(Action::Properties);
                if !by_artist {
                    actions.push(Action::GoToArtist);
                }
                if !by_album {
                    actions.push(Action::GoToAlbum);
                }
            }
            if selected == 1 {
                actions.push(Action::Edit);
            }
            actions
        }
        ListKind::Members => vec![
            Action::PlaylistAdd,
            Action::PlayNext,
            Action::AddToQueue,
            Action::Delete,
        ],
        ListKind::Artists | ListKind::Albums | ListKind::Genres | ListKind::Folders => {
            vec![Action::Play, Action::Shuffle]
        }
        ListKind::Playlists => {
            let mut actions = vec![Action::Delete];
            if state.focused().is_some() && selected < 2 {
                actions.push(Action::Edit);
            }
            actions
        }
    };

    if selected > 0 {
        actions.push(Action::SelectAll);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_AUDIOS: ListKind = ListKind::Audios {
        by_artist: false,
        by_album: false,
    };

    fn selection(keys: &[&str]) -> SelectionState {
        let mut state = SelectionState::new();
        for key in keys {
            state.toggle(key);
        }
        state
    }

    #[test]
    fn test_empty_selection_has_navigation_but_no_select_all() {
        let actions = actions(&SelectionState::new(), ALL_AUDIOS);
        assert!(actions.contains(&Action::GoToArtist));
        assert!(actions.contains(&Action::GoToAlbum));
        assert!(actions.contains(&Action::Properties));
        assert!(!actions.contains(&Action::SelectAll));
        assert!(!actions.contains(&Action::Edit));
    }

    #[test]
    fn test_single_selection_adds_select_all_and_edit() {
        let actions = actions(&selection(&["a"]), ALL_AUDIOS);
        assert!(actions.contains(&Action::SelectAll));
        assert!(actions.contains(&Action::Edit));
        assert!(actions.contains(&Action::GoToArtist));
    }

    #[test]
    fn test_multi_selection_drops_single_item_actions() {
        let actions = actions(&selection(&["a", "b"]), ALL_AUDIOS);
        for gone in [
            Action::Properties,
            Action::GoToArtist,
            Action::GoToAlbum,
            Action::Edit,
        ] {
            assert!(!actions.contains(&gone), "{:?} should be gone", gone);
        }
        assert!(actions.contains(&Action::SelectAll));
        assert!(actions.contains(&Action::PlaylistAdd));
    }

    #[test]
    fn test_scoped_audio_list_hides_redundant_navigation() {
        let kind = ListKind::Audios {
            by_artist: true,
            by_album: false,
        };
        let actions = actions(&SelectionState::new(), kind);
        assert!(!actions.contains(&Action::GoToArtist));
        assert!(actions.contains(&Action::GoToAlbum));
    }

    #[test]
    fn test_playlist_edit_needs_focus() {
        assert!(!actions(&SelectionState::new(), ListKind::Playlists).contains(&Action::Edit));

        let mut focused = SelectionState::new();
        focused.focus(Some("3".to_string()));
        assert!(actions(&focused, ListKind::Playlists).contains(&Action::Edit));
    }

    #[test]
    fn test_orders_per_kind() {
        assert_eq!(ALL_AUDIOS.orders().len(), 6);
        assert_eq!(
            ListKind::Albums.orders(),
            vec![OrderKey::None, OrderKey::Name, OrderKey::Artist]
        );
        assert_eq!(ListKind::Playlists.primary_actions(), vec![Action::Create]);
    }
}
