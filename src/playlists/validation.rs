use regex::Regex;

use super::PlaylistError;

/// First char a letter or digit, then letters, digits, spaces, `_` or `-`
const NAME_PATTERN: &str = r"^[\p{L}\p{N}][\p{L}\p{N} _\-]*$";

/// Check a user supplied playlist name
pub fn validate_name(name: &str) -> Result<(), PlaylistError> {
    if name.trim().is_empty() {
        return Err(PlaylistError::Validation("name must not be blank".to_string()));
    }

    let pattern = Regex::new(NAME_PATTERN)
        .map_err(|e| PlaylistError::Validation(format!("name pattern: {}", e)))?;

    if !pattern.is_match(name) {
        return Err(PlaylistError::Validation(format!(
            "'{}' must start with a letter or digit and contain no special characters",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["Road Trip", "2024 hits", "lo-fi_beats", "Café", "Mix 2"] {
            assert!(validate_name(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_rejects_special_characters() {
        for name in ["Trip!", "a/b", "rock & roll", "what?", "x.y"] {
            assert!(
                matches!(validate_name(name), Err(PlaylistError::Validation(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_rejects_private_prefix_and_blank() {
        assert!(validate_name("_favourite").is_err());
        assert!(validate_name(" leading").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }
}
