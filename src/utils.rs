use crate::consts::limits;

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escapes `text` and cuts it so the escaped form stays within `max_chars`.
/// Entities are never split.
pub fn escape_html_truncated(text: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let piece = escape_html(c.encode_utf8(&mut buf));
        let len = piece.chars().count();
        if used + len > max_chars {
            out.push_str("...");
            return out;
        }
        used += len;
        out.push_str(&piece);
    }
    out
}

/// "n/200" counter shown under the input
pub fn char_counter(input: &str) -> String {
    format!("{}/{}", input.chars().count(), limits::MAX_INPUT_CHARS)
}

/// Slash-prefixed text is a bot command, never panel input
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"a&b\"</b>"), "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;");
    }

    #[test]
    fn counter_counts_chars_not_bytes() {
        assert_eq!(char_counter(""), "0/200");
        assert_eq!(char_counter("héllo"), "5/200");
    }

    #[test]
    fn short_text_is_only_escaped() {
        assert_eq!(escape_html_truncated("a<b", 10), "a&lt;b");
        assert_eq!(escape_html_truncated("привет", 6), "привет");
    }

    #[test]
    fn truncation_bounds_escaped_length() {
        let out = escape_html_truncated(&"&".repeat(5000), 3000);
        assert!(out.chars().count() <= 3003);
        assert!(out.ends_with("&amp;..."));
        assert_eq!(escape_html_truncated("привет", 3), "при...");
    }

    #[test]
    fn slash_text_is_a_command() {
        assert!(is_command("/foo"));
        assert!(is_command("  /start@bot"));
        assert!(!is_command("hello / world"));
    }
}
