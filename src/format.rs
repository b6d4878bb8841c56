//! Formatting feed entries as plain-text Slack messages.
//!
//! Summaries arrive as feed-provided HTML fragments. Slack incoming
//! webhooks want plain text, so tags are stripped with a regex, `&nbsp;`
//! entities become spaces, runs of whitespace collapse, and the result is
//! truncated to a readable length.

use crate::models::{FeedEntry, FeedStats};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum summary length, in characters, appended to a message.
pub const SUMMARY_MAX_CHARS: usize = 300;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static NBSP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&nbsp;?").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip HTML tags and collapse whitespace.
///
/// Tags are replaced by spaces (not removed outright) so `a<br>b` keeps a
/// word boundary. This is a formatter for human-readable snippets, not an
/// HTML sanitizer.
pub fn strip_html(s: &str) -> String {
    let s = TAG_RE.replace_all(s, " ");
    let s = NBSP_RE.replace_all(&s, " ");
    WS_RE.replace_all(&s, " ").trim().to_string()
}

/// Truncate to `max` characters, appending `…` when shortened.
///
/// Operates on chars, not bytes, so multi-byte text never splits mid
/// character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push('…');
        out
    }
}

/// Render one entry as Slack message text.
///
/// Shape: `*New:* {title}` on the first line, the link on the second, and
/// the truncated stripped summary on a third line when non-empty.
pub fn entry_text(entry: &FeedEntry) -> String {
    let mut text = format!("*New:* {}\n{}", entry.title, entry.link);
    if let Some(summary) = entry.summary.as_deref() {
        let stripped = strip_html(summary);
        if !stripped.is_empty() {
            text.push('\n');
            text.push_str(&truncate_chars(&stripped, SUMMARY_MAX_CHARS));
        }
    }
    text
}

/// One feed's result line in the run summary.
pub fn feed_result_line(index: usize, url: &str, stats: &FeedStats) -> String {
    format!(
        "{index}) {url}\n   result: total={}, in_window={}, posted={}, \
         skipped(no_date={}, old={}, seen={}), errors={}",
        stats.total,
        stats.in_window,
        stats.posted,
        stats.skipped_no_date,
        stats.skipped_old,
        stats.skipped_seen,
        stats.errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_summary(summary: Option<&str>) -> FeedEntry {
        FeedEntry {
            id: "e-1".to_string(),
            title: "Big News".to_string(),
            link: "https://news.example/big".to_string(),
            summary: summary.map(str::to_string),
            published: None,
        }
    }

    #[test]
    fn test_strip_html_removes_tags_and_entities() {
        assert_eq!(
            strip_html("<p>Hello&nbsp;<b>world</b></p>"),
            "Hello world"
        );
    }

    #[test]
    fn test_strip_html_keeps_word_boundaries() {
        assert_eq!(strip_html("one<br>two"), "one two");
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(strip_html("  a \n\t b   c  "), "a b c");
    }

    #[test]
    fn test_truncate_chars_short_string_untouched() {
        assert_eq!(truncate_chars("short", 300), "short");
    }

    #[test]
    fn test_truncate_chars_appends_ellipsis() {
        let long = "a".repeat(301);
        let result = truncate_chars(&long, 300);
        assert_eq!(result.chars().count(), 301);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let s = "日本語のテキスト";
        let result = truncate_chars(s, 3);
        assert_eq!(result, "日本語…");
    }

    #[test]
    fn test_entry_text_without_summary() {
        let entry = entry_with_summary(None);
        assert_eq!(entry_text(&entry), "*New:* Big News\nhttps://news.example/big");
    }

    #[test]
    fn test_entry_text_with_html_summary() {
        let entry = entry_with_summary(Some("<p>A <i>short</i> summary</p>"));
        assert_eq!(
            entry_text(&entry),
            "*New:* Big News\nhttps://news.example/big\nA short summary"
        );
    }

    #[test]
    fn test_entry_text_skips_summary_that_strips_to_nothing() {
        let entry = entry_with_summary(Some("<p>&nbsp;</p>"));
        assert_eq!(entry_text(&entry), "*New:* Big News\nhttps://news.example/big");
    }

    #[test]
    fn test_feed_result_line() {
        let stats = FeedStats {
            total: 10,
            in_window: 3,
            posted: 2,
            skipped_no_date: 1,
            skipped_old: 6,
            skipped_seen: 0,
            errors: 0,
        };
        assert_eq!(
            feed_result_line(1, "https://news.example/feed.xml", &stats),
            "1) https://news.example/feed.xml\n   result: total=10, in_window=3, \
             posted=2, skipped(no_date=1, old=6, seen=0), errors=0"
        );
    }
}
