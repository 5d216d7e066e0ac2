use std::collections::HashSet;

/// How much of a group is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    None,
    Partial,
    Full,
}

/// Multi-select keys plus the single focused (expanded) item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<String>,
    focused: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flip `key`; returns whether it is selected afterwards
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    pub fn focus(&mut self, key: Option<String>) {
        self.focused = key;
    }

    /// Drop every selection and the focus
    pub fn clear(&mut self) {
        self.selected.clear();
        self.focused = None;
    }

    /// Keep only keys for which `keep` holds, the focus included
    pub fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        self.selected.retain(|key| keep(key));
        if self.focused.as_deref().is_some_and(|key| !keep(key)) {
            self.focused = None;
        }
    }

    pub fn select_all(&mut self, keys: impl IntoIterator<Item = String>) {
        self.selected.extend(keys);
    }

    /// Selection level of a group given its member keys
    pub fn level<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Level {
        let mut total = 0;
        let mut hits = 0;
        for key in keys {
            total += 1;
            if self.selected.contains(key) {
                hits += 1;
            }
        }

        if total > 0 && hits == total {
            Level::Full
        } else if hits > 0 {
            Level::Partial
        } else {
            Level::None
        }
    }

    /// Select a whole group, or clear it when it is already fully selected.
    ///
    /// Returns the group's new level.
    pub fn toggle_group(&mut self, keys: &[String]) -> Level {
        if self.level(keys.iter().map(String::as_str)) == Level::Full {
            for key in keys {
                self.selected.remove(key);
            }
            Level::None
        } else {
            self.selected.extend(keys.iter().cloned());
            if keys.is_empty() {
                Level::None
            } else {
                Level::Full
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut state = SelectionState::new();
        assert!(state.toggle("a"));
        assert!(state.is_selected("a"));
        assert!(!state.toggle("a"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_clear_drops_focus_too() {
        let mut state = SelectionState::new();
        state.toggle("a");
        state.focus(Some("b".to_string()));
        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.focused(), None);
    }

    #[test]
    fn test_group_levels() {
        let group = keys(&["a", "b", "c"]);
        let mut state = SelectionState::new();
        assert_eq!(state.level(group.iter().map(String::as_str)), Level::None);

        state.toggle("b");
        assert_eq!(state.level(group.iter().map(String::as_str)), Level::Partial);

        assert_eq!(state.toggle_group(&group), Level::Full);
        assert_eq!(state.level(group.iter().map(String::as_str)), Level::Full);

        assert_eq!(state.toggle_group(&group), Level::None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_group_leaves_other_groups_alone() {
        let mut state = SelectionState::new();
        state.toggle("x");
        state.toggle_group(&keys(&["a", "b"]));
        state.toggle_group(&keys(&["a", "b"]));
        assert!(state.is_selected("x"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_retain_prunes_selection_and_focus() {
        let mut state = SelectionState::new();
        state.toggle("a");
        state.toggle("b");
        state.focus(Some("b".to_string()));

        state.retain(|key| key == "a");
        assert!(state.is_selected("a"));
        assert!(!state.is_selected("b"));
        assert_eq!(state.focused(), None);
    }
}
