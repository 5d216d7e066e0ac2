//! Group header functions shared by the list kinds

use chrono::{DateTime, Utc};

/// Upper-cased first character, or empty for an empty name
pub fn first_letter(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Coarse duration bucket
pub fn length_bucket(duration_ms: i64) -> String {
    let minutes = duration_ms / 60_000;
    let label = match minutes {
        m if m < 2 => "< 2 mins",
        m if m < 5 => "< 5 mins",
        m if m < 10 => "< 10 mins",
        _ => "> 10 mins",
    };
    label.to_string()
}

/// Month and year, e.g. "March 2024"
pub fn month(date: &DateTime<Utc>) -> String {
    date.format("%B %Y").to_string()
}

/// Last path segment of a folder
pub fn folder_name(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
