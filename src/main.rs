//! # rss_to_slack
//!
//! A scheduled notifier that fetches a configured set of RSS/Atom feeds and
//! posts newly-published entries to a Slack channel via an incoming
//! webhook. There is no server process; an external scheduler (cron, CI
//! workflow) runs the binary periodically.
//!
//! ## Duplicate suppression
//!
//! Two strategies, selected by configuration:
//!
//! - **Time window** (default): only entries published within the last
//!   `POST_WINDOW_MIN` minutes are posted. Pair the window with the
//!   scheduler interval (e.g. hourly runs, 70-minute window).
//! - **Seen file** (`SEEN_FILE`): entry identifiers are persisted to a flat
//!   file between runs; an entry is posted once, ever.
//!
//! ## Usage
//!
//! ```sh
//! FEED_URLS=https://example.com/feed.xml \
//! SLACK_WEBHOOK_URL=https://hooks.slack.com/services/T/B/X \
//! rss_to_slack
//! ```
//!
//! ## Architecture
//!
//! A single-pass pipeline: load configuration, fetch and parse each feed,
//! filter entries through the dedup policy, format and post the new ones,
//! post a run summary, and persist the seen set when one is in use. A
//! failing feed is logged and counted, never fatal.

use chrono::{Duration, Utc};
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::time::Duration as StdDuration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod feeds;
mod filter;
mod format;
mod models;
mod slack;
mod state;
mod utils;

use cli::Cli;
use filter::{DedupPolicy, Verdict};
use format::{entry_text, feed_result_line};
use models::{FeedEntry, FeedStats};
use slack::SlackClient;
use state::SeenFile;

/// Timeout applied to every feed fetch and webhook post.
const HTTP_TIMEOUT: StdDuration = StdDuration::from_secs(20);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("rss_to_slack starting up");
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    run(args).await
}

/// Execute one full scan: fetch, filter, post, summarize, persist.
///
/// Split out of `main` so the whole pipeline can be driven against a local
/// server in tests.
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    if let Err(e) = args.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e);
    }
    let feed_urls = args.feeds();

    // --- Dedup policy ---
    let now = Utc::now();
    let mut policy = match args.seen_file.as_deref() {
        Some(path) => {
            let seen = SeenFile::load(path).await?;
            info!(path, known_ids = seen.len(), "Using seen-file dedup");
            DedupPolicy::SeenSet(seen)
        }
        None => {
            let cutoff = now - Duration::minutes(args.post_window_min);
            info!(window_min = args.post_window_min, %cutoff, "Using time-window dedup");
            DedupPolicy::Window { cutoff }
        }
    };

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let slack = SlackClient::new(http.clone(), args.webhook_url.as_str());

    // ---- Fetch all feeds ----
    let fetched: Vec<(String, Result<Vec<FeedEntry>, Box<dyn Error>>)> =
        stream::iter(feed_urls.iter().cloned())
            .then(|url| {
                let http = http.clone();
                async move {
                    let result = feeds::fetch_entries(&http, &url).await;
                    (url, result)
                }
            })
            .collect()
            .await;

    // ---- Filter, format, post ----
    let outcome = scan_feeds(fetched, &mut policy, &slack, args.max_posts, args.dry_run).await;

    // ---- Run summary (always posted, dry-run included) ----
    let mode = match &policy {
        DedupPolicy::Window { .. } => format!("last {} min", args.post_window_min),
        DedupPolicy::SeenSet(_) => format!(
            "seen-file {}",
            args.seen_file.as_deref().unwrap_or_default()
        ),
    };
    let mut summary_lines = vec![format!(
        "Feed scan summary\n- now(UTC): {}\n- mode    : {mode}\n- dry_run : {}\n- max_posts: {}\n- feeds   : {}",
        now.format("%Y-%m-%d %H:%M"),
        args.dry_run,
        args.max_posts,
        feed_urls.len()
    )];
    summary_lines.extend(outcome.result_lines);
    summary_lines.push(format!("\nposted(total) = {}", outcome.total_posted));
    if !outcome.err_snippets.is_empty() {
        summary_lines.push("\nerrors:".to_string());
        summary_lines.extend(outcome.err_snippets);
    }
    let summary = summary_lines.join("\n");

    info!(%summary, "Run summary");
    if let Err(e) = slack.post_text(&summary).await {
        warn!(error = %e, "Failed to post run summary to Slack");
    }

    // ---- Persist seen set ----
    if let DedupPolicy::SeenSet(seen) = &policy {
        if args.dry_run {
            info!("Dry run; seen file left untouched");
        } else if let Err(e) = seen.save().await {
            error!(error = %e, "Failed to save seen file");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        posted = outcome.total_posted,
        "Execution complete"
    );

    Ok(())
}

/// What one scan produced, feeding the run summary.
#[derive(Debug)]
struct ScanOutcome {
    /// Entries posted across all feeds, capped by `max_posts`.
    total_posted: usize,
    /// One rendered result line per feed, in configuration order.
    result_lines: Vec<String>,
    /// One line per failed feed for the summary's errors section.
    err_snippets: Vec<String>,
}

/// Filter, format and post the fetched entries, feed by feed.
///
/// Holds the invariants of a scan:
/// - at most `max_posts` entries are posted per run; entries past the cap
///   still count as `in_window` but are not posted and not marked seen,
/// - a dry run counts entries as posted without posting or marking them,
/// - a failed post leaves the entry unmarked so a later run retries it,
/// - a failed feed is counted and reported, never fatal.
async fn scan_feeds(
    fetched: Vec<(String, Result<Vec<FeedEntry>, Box<dyn Error>>)>,
    policy: &mut DedupPolicy,
    slack: &SlackClient,
    max_posts: usize,
    dry_run: bool,
) -> ScanOutcome {
    let mut total_posted = 0usize;
    let mut result_lines = Vec::new();
    let mut err_snippets = Vec::new();

    for (index, (url, result)) in fetched.into_iter().enumerate() {
        let mut stats = FeedStats::default();

        match result {
            Ok(entries) => {
                stats.total = entries.len();
                for entry in &entries {
                    match policy.check(&url, entry) {
                        Verdict::NoDate => stats.skipped_no_date += 1,
                        Verdict::TooOld => stats.skipped_old += 1,
                        Verdict::AlreadySeen => stats.skipped_seen += 1,
                        Verdict::New => {
                            stats.in_window += 1;
                            // Cap reached: keep counting, stop posting.
                            if total_posted >= max_posts {
                                continue;
                            }
                            if post_entry(slack, &url, entry, dry_run).await {
                                stats.posted += 1;
                                total_posted += 1;
                                if !dry_run {
                                    policy.mark_seen(&url, entry);
                                }
                            }
                        }
                    }
                }
            }
            Err(e) => {
                stats.errors += 1;
                error!(%url, error = %e, "Feed scan failed");
                err_snippets.push(format!("- {url} -> {e}"));
            }
        }

        info!(
            %url,
            total = stats.total,
            in_window = stats.in_window,
            posted = stats.posted,
            skipped_no_date = stats.skipped_no_date,
            skipped_old = stats.skipped_old,
            skipped_seen = stats.skipped_seen,
            errors = stats.errors,
            "Feed scan complete"
        );
        result_lines.push(feed_result_line(index + 1, &url, &stats));
    }

    ScanOutcome {
        total_posted,
        result_lines,
        err_snippets,
    }
}

/// Format one entry and post it, unless this is a dry run.
///
/// Returns whether the entry counts as posted. A failed post is logged and
/// does not count; in seen-file mode the entry stays unseen and a later run
/// retries it.
#[instrument(level = "debug", skip_all, fields(%feed_url, entry_id = %entry.id))]
async fn post_entry(slack: &SlackClient, feed_url: &str, entry: &FeedEntry, dry_run: bool) -> bool {
    let text = entry_text(entry);
    if dry_run {
        info!(title = %entry.title, "Dry run; would post entry");
        return true;
    }
    match slack.post_text(&text).await {
        Ok(()) => {
            info!(title = %entry.title, link = %entry.link, "Posted entry");
            true
        }
        Err(e) => {
            error!(title = %entry.title, error = %e, "Slack post failed; entry not marked seen");
            false
        }
    }
}
