//! Helpers for printing stored bytes in logs.

use std::borrow::Cow;

/// Cut `s` to at most `max_chars` characters, appending `...` when anything
/// was dropped.
pub fn truncate(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Owned(format!("{}...", &s[..idx])),
        None => Cow::Borrowed(s),
    }
}

/// Render a stored key or value: UTF-8 text as-is, anything else as hex.
pub fn render_bytes(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(format!("0x{}", hex::encode(bytes))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_borrowed() {
        assert!(matches!(truncate("abc", 10), Cow::Borrowed("abc")));
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn long_strings_are_cut() {
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn cuts_on_char_boundaries() {
        assert_eq!(truncate("ééé", 2), "éé...");
    }

    #[test]
    fn binary_is_hex_encoded() {
        assert_eq!(render_bytes(&[0xff, 0x00]), "0xff00");
        assert_eq!(render_bytes(b"curl"), "curl");
    }
}
