//! Helpers for Telegram MarkdownV2 text.

const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escapes every character that has a meaning in MarkdownV2.
///
/// # Example
/// ```
/// use wellbeing_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("Hi *there* (5)!"), "Hi \\*there\\* \\(5\\)\\!");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Shortens `text` to at most `max_chars` characters, adding an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_job_listing() {
        let input = "diary - 2026-10-16 (all users)!";
        let expected = "diary \\- 2026\\-10\\-16 \\(all users\\)\\!";
        assert_eq!(escape_markdown(input), expected);
    }

    #[test]
    fn test_escape_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("plain text 123"), "plain text 123");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a longer sentence", 8), "a longer…");
        assert_eq!(preview("привет мир", 6), "привет…");
    }
}
