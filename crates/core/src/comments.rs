//! Comment text validation.

use crate::error::CoreError;

/// Maximum length of a comment in characters (after trimming).
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Trim a comment and reject it if nothing is left or it is too long.
///
/// Returns the trimmed text that should be stored.
pub fn normalize_comment_text(text: &str) -> Result<String, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Comment cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            normalize_comment_text("  looks good \n").unwrap(),
            "looks good"
        );
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert_matches!(normalize_comment_text(""), Err(CoreError::Validation(_)));
        assert_matches!(
            normalize_comment_text(" \t\n "),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_overlong_comment() {
        let text = "x".repeat(MAX_COMMENT_LENGTH + 1);
        assert_matches!(normalize_comment_text(&text), Err(CoreError::Validation(_)));
    }
}
