use serde::{Deserialize, Serialize};

/// Sort keys a list can be ordered (and grouped) by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    None,
    Name,
    DateModified,
    DateAdded,
    Artist,
    Album,
    Folder,
    Length,
}

/// Sort key, direction and free-text query of a list.
///
/// Immutable; every change builds a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub order: OrderKey,
    pub query: Option<String>,
    pub ascending: bool,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            order: OrderKey::Name,
            query: None,
            ascending: true,
        }
    }
}

impl Filter {
    pub fn new(order: OrderKey, ascending: bool) -> Self {
        Filter {
            order,
            query: None,
            ascending,
        }
    }

    /// Same filter with a different query. Blank text means no text filter.
    pub fn with_query(&self, query: Option<&str>) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Filter {
            query,
            ..self.clone()
        }
    }

    /// Same query, new order and direction
    pub fn with_order(&self, order: OrderKey, ascending: bool) -> Self {
        Filter {
            order,
            ascending,
            query: self.query.clone(),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Case-insensitive substring match of `name` against `text`.
///
/// Plain Unicode lowercase folding; no character is a wildcard. Missing or
/// blank text matches everything.
pub fn text_matches(text: Option<&str>, name: &str) -> bool {
    match text.map(str::trim) {
        None | Some("") => true,
        Some(text) => name.to_lowercase().contains(&text.to_lowercase()),
    }
}
