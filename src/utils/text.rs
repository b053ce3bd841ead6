//! Text processing utilities.

/// Minimum non-whitespace characters for meaningful content.
pub const MIN_CONTENT_LENGTH: usize = 10;

/// Check if content has meaningful text (not just whitespace/punctuation).
pub fn has_meaningful_content(content: &str) -> bool {
    content.chars().filter(|c| !c.is_whitespace()).count() >= MIN_CONTENT_LENGTH
}

/// Collapse runs of whitespace (including newlines from nested HTML text
/// nodes) into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_meaningful_content() {
        assert!(!has_meaningful_content(""));
        assert!(!has_meaningful_content("   \n\n   "));
        assert!(!has_meaningful_content("short"));
        assert!(!has_meaningful_content(&" ".repeat(1000)));
        assert!(has_meaningful_content("A course about Rust."));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Intro \n  to\tRust  "), "Intro to Rust");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("one"), "one");
    }
}
