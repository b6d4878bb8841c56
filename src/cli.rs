//! Command-line interface definitions for rss_to_slack.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment
//! variables, which is how a scheduled runner (cron, CI workflow) normally
//! configures the program.

use clap::Parser;
use std::error::Error;
use url::Url;

/// Command-line arguments for rss_to_slack.
///
/// This struct defines all configuration options that can be passed to the
/// application at runtime. Options include the feed URL list, the Slack
/// webhook, and the duplicate-suppression strategy.
///
/// # Examples
///
/// ```sh
/// # Time-window dedup (default): post entries from the last 24h
/// rss_to_slack --feed-urls https://example.com/a.xml,https://example.com/b.xml \
///     --webhook-url https://hooks.slack.com/services/T/B/X
///
/// # Seen-file dedup: post entries whose IDs are not in the state file
/// rss_to_slack --seen-file ./seen_ids.txt ...
///
/// # Scan without posting entries
/// rss_to_slack --dry-run ...
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Comma-separated list of RSS/Atom feed URLs
    #[arg(long, env = "FEED_URLS", value_delimiter = ',', required = true)]
    pub feed_urls: Vec<String>,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL")]
    pub webhook_url: String,

    /// Only post entries published within the last N minutes (ignored when --seen-file is set)
    #[arg(long, env = "POST_WINDOW_MIN", default_value_t = 1440)]
    pub post_window_min: i64,

    /// Maximum number of entry posts per run
    #[arg(long, env = "MAX_POSTS", default_value_t = 30)]
    pub max_posts: usize,

    /// Path to the seen-ID file; when set, persisted-set dedup replaces the time window
    #[arg(long, env = "SEEN_FILE")]
    pub seen_file: Option<String>,

    /// Scan and summarize without posting entries (accepts 1/true/yes/on)
    #[arg(
        long,
        env = "DRY_RUN",
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub dry_run: bool,
}

impl Cli {
    /// Return the configured feed URLs trimmed, with empty segments dropped.
    ///
    /// `FEED_URLS="a, b,,c"` yields `["a", "b", "c"]`.
    pub fn feeds(&self) -> Vec<String> {
        self.feed_urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    }

    /// Validate the webhook URL and every feed URL before the run starts.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first malformed URL, or an error when the
    /// feed list is empty after trimming.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        Url::parse(&self.webhook_url)
            .map_err(|e| format!("invalid webhook URL {:?}: {e}", self.webhook_url))?;
        let feeds = self.feeds();
        if feeds.is_empty() {
            return Err("FEED_URLS contains no feed URLs".into());
        }
        for feed in &feeds {
            Url::parse(feed).map_err(|e| format!("invalid feed URL {feed:?}: {e}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "rss_to_slack",
            "--feed-urls",
            "https://example.com/feed.xml",
            "--webhook-url",
            "https://hooks.slack.com/services/T/B/X",
        ]
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::parse_from(base_args());

        assert_eq!(cli.feed_urls, vec!["https://example.com/feed.xml"]);
        assert_eq!(cli.webhook_url, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(cli.post_window_min, 1440);
        assert_eq!(cli.max_posts, 30);
        assert!(cli.seen_file.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_comma_separated_feeds() {
        let cli = Cli::parse_from([
            "rss_to_slack",
            "--feed-urls",
            "https://a.example/feed.xml, https://b.example/atom.xml,",
            "--webhook-url",
            "https://hooks.slack.com/services/T/B/X",
        ]);

        assert_eq!(
            cli.feeds(),
            vec![
                "https://a.example/feed.xml".to_string(),
                "https://b.example/atom.xml".to_string(),
            ]
        );
    }

    #[test]
    fn test_cli_seen_file_and_dry_run() {
        let mut args = base_args();
        args.extend(["--seen-file", "/tmp/seen.txt", "--dry-run"]);
        let cli = Cli::parse_from(args);

        assert_eq!(cli.seen_file.as_deref(), Some("/tmp/seen.txt"));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_dry_run_accepts_truthy_values() {
        // The same parser handles the DRY_RUN environment variable.
        for value in ["1", "true", "yes", "on"] {
            let mut args = base_args();
            args.extend(["--dry-run", value]);
            let cli = Cli::parse_from(args);
            assert!(cli.dry_run, "expected {value:?} to enable dry run");
        }
        for value in ["0", "false", "no", "off"] {
            let mut args = base_args();
            args.extend(["--dry-run", value]);
            let cli = Cli::parse_from(args);
            assert!(!cli.dry_run, "expected {value:?} to disable dry run");
        }
    }

    #[test]
    fn test_validate_rejects_bad_webhook() {
        let cli = Cli::parse_from([
            "rss_to_slack",
            "--feed-urls",
            "https://example.com/feed.xml",
            "--webhook-url",
            "not a url",
        ]);

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_feed_list() {
        let cli = Cli::parse_from([
            "rss_to_slack",
            "--feed-urls",
            " , ",
            "--webhook-url",
            "https://hooks.slack.com/services/T/B/X",
        ]);

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_good_config() {
        let cli = Cli::parse_from(base_args());
        assert!(cli.validate().is_ok());
    }
}
