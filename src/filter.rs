//! Entry filtering: deciding which feed entries are "new".
//!
//! Two duplicate-suppression strategies exist, selected by configuration:
//!
//! - **Time window**: only entries published within the last N minutes are
//!   new. No state survives the run; the external scheduler's interval and
//!   the window overlap to suppress duplicates. Entries without a parseable
//!   date cannot be placed in the window and are skipped.
//! - **Seen set**: an entry is new iff its [`dedup_key`] is absent from a
//!   persisted identifier set. Dates are irrelevant here.
//!
//! [`dedup_key`]: crate::feeds::dedup_key

use crate::feeds::dedup_key;
use crate::models::FeedEntry;
use crate::state::SeenFile;
use chrono::{DateTime, Utc};

/// Why an entry was or was not considered new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Entry passes the filter and may be posted.
    New,
    /// Window mode: published before the cutoff.
    TooOld,
    /// Window mode: no parseable publication date.
    NoDate,
    /// Seen-set mode: identifier already persisted.
    AlreadySeen,
}

/// The configured duplicate-suppression strategy.
#[derive(Debug)]
pub enum DedupPolicy {
    /// Rolling time window: entries at or after `cutoff` are new.
    Window { cutoff: DateTime<Utc> },
    /// Persisted identifier set.
    SeenSet(SeenFile),
}

impl DedupPolicy {
    /// Classify one entry against this policy.
    pub fn check(&self, feed_url: &str, entry: &FeedEntry) -> Verdict {
        match self {
            DedupPolicy::Window { cutoff } => match entry.published {
                None => Verdict::NoDate,
                Some(published) if published < *cutoff => Verdict::TooOld,
                Some(_) => Verdict::New,
            },
            DedupPolicy::SeenSet(seen) => {
                if seen.contains(&dedup_key(feed_url, entry)) {
                    Verdict::AlreadySeen
                } else {
                    Verdict::New
                }
            }
        }
    }

    /// Record an entry as seen. A no-op in window mode.
    ///
    /// Called only for entries that were actually posted, so entries held
    /// back by the per-run post cap are picked up by a later run.
    pub fn mark_seen(&mut self, feed_url: &str, entry: &FeedEntry) {
        if let DedupPolicy::SeenSet(seen) = self {
            seen.insert(dedup_key(feed_url, entry));
        }
    }
}
