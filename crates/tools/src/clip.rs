//! Byte-bounded truncation that respects UTF-8 char boundaries.

/// Truncate `text` to at most `max_bytes` bytes, backing up to the nearest
/// char boundary, and append an ellipsis when anything was cut.
pub(crate) fn clip(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push('…');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        let mut text = String::from("short");
        clip(&mut text, 100);
        assert_eq!(text, "short");
    }

    #[test]
    fn ascii_cuts_at_the_limit() {
        let mut text = "x".repeat(20);
        clip(&mut text, 10);
        assert_eq!(text, format!("{}…", "x".repeat(10)));
    }

    #[test]
    fn multibyte_backs_up_to_a_char_boundary() {
        // "→" is 3 bytes; a limit of 4 lands mid-char
        let mut text = "→→→".to_string();
        clip(&mut text, 4);
        assert_eq!(text, "→…");
    }

    #[test]
    fn limit_on_a_boundary_keeps_the_char() {
        let mut text = "→→→".to_string();
        clip(&mut text, 6);
        assert_eq!(text, "→→…");
    }
}
