//! Data models for feed entries and run accounting.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedEntry`]: A single parsed RSS/Atom entry, normalized for posting
//! - [`FeedStats`]: Per-feed counters collected during a scan
//! - [`SlackPayload`]: The JSON body posted to the incoming webhook

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single feed entry, normalized from the RSS/Atom model.
///
/// All fields are already decoded text; HTML stripping and truncation
/// happen later, in the formatter.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    /// The entry's identifier as declared by the feed (guid / atom:id),
    /// falling back to the entry link when the feed provides none.
    pub id: String,
    /// The entry title, `(no title)` when absent.
    pub title: String,
    /// The entry's primary link, empty when absent.
    pub link: String,
    /// Raw summary or description, possibly containing HTML.
    pub summary: Option<String>,
    /// Publication timestamp; `published` preferred, `updated` as fallback.
    pub published: Option<DateTime<Utc>>,
}

/// Counters for one feed's scan, reported in the run summary.
///
/// The field set mirrors the per-feed result line:
/// `total=.. in_window=.. posted=.. skipped(no_date=.., old=.., seen=..) errors=..`
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedStats {
    /// Entries found in the feed.
    pub total: usize,
    /// Entries that passed the dedup filter (posted or not).
    pub in_window: usize,
    /// Entries actually posted (or that would have been, in dry-run).
    pub posted: usize,
    /// Entries skipped because they carry no parseable date (window mode).
    pub skipped_no_date: usize,
    /// Entries skipped because they fall before the window cutoff.
    pub skipped_old: usize,
    /// Entries skipped because their ID is already in the seen set.
    pub skipped_seen: usize,
    /// Fetch/parse failures for this feed.
    pub errors: usize,
}

/// The JSON body of a Slack incoming-webhook post: `{"text": "..."}`.
#[derive(Debug, Serialize)]
pub struct SlackPayload<'a> {
    pub text: &'a str,
}
