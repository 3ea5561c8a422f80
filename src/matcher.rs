//! Separator matching and buffer splitting.

use crate::error::Result;
use regex::Regex;

/// Pattern matching an optional carriage return followed by a newline.
const DEFAULT_PATTERN: &str = r"\r?\n";

/// The pattern used to split buffered text into discrete lines.
///
/// Each engine instance owns its own `Separator`; the default handles both
/// Unix and Windows line endings.
#[derive(Debug, Clone)]
pub struct Separator(Regex);

impl Separator {
    /// Compiles a custom separator pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub(crate) fn split<'t>(&self, text: &'t str) -> regex::Split<'_, 't> {
        self.0.split(text)
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(Regex::new(DEFAULT_PATTERN).expect("default separator pattern compiles"))
    }
}

impl From<Regex> for Separator {
    fn from(pattern: Regex) -> Self {
        Self(pattern)
    }
}

/// Splits the accumulated buffer into lines wherever the separator occurs.
///
/// If the separator matches nowhere the buffer is left untouched and no lines
/// are produced; the caller waits for more bytes. If it matches at least once
/// the *entire* buffer is split on every occurrence, empty segments are
/// dropped, and the buffer is cleared. Note that this flushes a trailing
/// segment that has no separator after it yet; bytes arriving later for that
/// same line start a fresh segment.
pub(crate) fn split_lines(buffer: &mut String, separator: &Separator) -> Vec<String> {
    if !separator.is_match(buffer) {
        return Vec::new();
    }

    let lines = separator
        .split(buffer)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect();
    buffer.clear();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_unix_line_endings() {
        let mut buffer = "line1\nline2\nline3\n".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["line1", "line2", "line3"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn splits_on_windows_line_endings() {
        let mut buffer = "line1\r\nline2\r\n".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["line1", "line2"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn no_separator_leaves_buffer_untouched() {
        let mut buffer = "partial line without ending".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert!(lines.is_empty());
        assert_eq!(buffer, "partial line without ending");
    }

    #[test]
    fn empty_buffer_produces_nothing() {
        let mut buffer = String::new();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert!(lines.is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn drops_empty_segments() {
        let mut buffer = "\nline1\n\n\nline2\n".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["line1", "line2"]);
    }

    #[test]
    fn keeps_whitespace_only_segments() {
        let mut buffer = "line1\n   \nline2\n".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["line1", "   ", "line2"]);
    }

    #[test]
    fn flushes_unterminated_tail_segment() {
        // Known edge case: once any separator is present, the whole buffer is
        // flushed, including a final segment the file has not terminated yet.
        let mut buffer = "complete\nstill being writ".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["complete", "still being writ"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn custom_separator_splits_accordingly() {
        let separator = Separator::new(r"\|").unwrap();
        let mut buffer = "data1|data2|data3|".to_string();
        let lines = split_lines(&mut buffer, &separator);

        assert_eq!(lines, vec!["data1", "data2", "data3"]);
    }

    #[test]
    fn custom_separator_ignores_default_endings() {
        let separator = Separator::new(r"\|").unwrap();
        let mut buffer = "one\ntwo".to_string();
        let lines = split_lines(&mut buffer, &separator);

        assert!(lines.is_empty());
        assert_eq!(buffer, "one\ntwo");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(Separator::new("[").is_err());
    }

    #[test]
    fn default_handles_mixed_endings_in_one_buffer() {
        let mut buffer = "a\r\nb\nc\r\n".to_string();
        let lines = split_lines(&mut buffer, &Separator::default());

        assert_eq!(lines, vec!["a", "b", "c"]);
    }
}
