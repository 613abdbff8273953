//! Fixed-width column helpers for receipt tables
//!
//! Widths are counted in characters; receipts are single-byte codepage
//! text so character count equals printed width.

/// Truncate a string to fit within a column width
pub fn truncate(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// Pad a string to a column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad(s: &str, width: usize, align_right: bool) -> String {
    let len = s.chars().count();
    if len >= width {
        return truncate(s, width);
    }
    let spaces = width - len;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Hard-split a string into column-width chunks
///
/// Splitting is at exact character boundaries, not word-aware. Always
/// yields at least one chunk (empty input gives one empty chunk).
pub fn wrap_hard(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello world", 5), "hello");
        assert_eq!(truncate("hi", 5), "hi");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("hi", 5, false), "hi   ");
        assert_eq!(pad("hi", 5, true), "   hi");
        assert_eq!(pad("hello world", 5, false), "hello");
    }

    #[test]
    fn test_wrap_hard_splits_at_boundary() {
        let chunks = wrap_hard("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_hard_short_input() {
        assert_eq!(wrap_hard("abc", 24), vec!["abc"]);
        assert_eq!(wrap_hard("", 24), vec![""]);
    }
}
