//! Utility functions for text normalization

use regex::Regex;
use std::sync::OnceLock;

fn tag_pattern() -> Option<&'static Regex> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").ok()).as_ref()
}

/// Remove HTML tags from a task description
///
/// Entities are left untouched; only `<...>` spans are dropped.
///
/// # Examples
///
/// ```
/// use nexy_tasks::utils::strip_html;
///
/// assert_eq!(strip_html("Follow <b>@nexy</b> on X"), "Follow @nexy on X");
/// ```
pub fn strip_html(input: &str) -> String {
    match tag_pattern() {
        Some(re) => re.replace_all(input, "").into_owned(),
        None => input.to_string(),
    }
}

/// Split newline-delimited text into trimmed, non-empty lines
pub fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate to `max` characters, marking the cut with `...`
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_and_attributed_tags() {
        assert_eq!(
            strip_html(r#"<p>Join <a href="https://t.me/x">Telegram</a></p>"#),
            "Join Telegram"
        );
        assert_eq!(strip_html("no tags here"), "no tags here");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn lone_angle_brackets_survive() {
        assert_eq!(strip_html("points < 10 and > 2"), "points < 10 and > 2");
    }

    #[test]
    fn blank_lines_and_padding_are_dropped() {
        let lines = non_blank_lines("  tok1  \n\n\r\ntok2\r\n   \n");
        assert_eq!(lines, vec!["tok1".to_string(), "tok2".to_string()]);
    }

    #[test]
    fn truncation_matches_table_width() {
        assert_eq!(truncate_with_ellipsis("short", 20), "short");
        assert_eq!(
            truncate_with_ellipsis("Follow Nexy AI on X and retweet", 20),
            "Follow Nexy AI on..."
        );
        assert_eq!(truncate_with_ellipsis("Follow Nexy AI on X and retweet", 20).chars().count(), 20);
    }
}
