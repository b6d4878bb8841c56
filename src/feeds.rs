//! Feed fetching and parsing.
//!
//! This module downloads a feed URL and normalizes its entries into
//! [`FeedEntry`] values. Parsing of the RSS/Atom payload itself is delegated
//! to `feed-rs`; this module only maps its model onto ours and builds the
//! stable identifier used by the seen-set dedup variant.
//!
//! Fetching and parsing are split so parsing can be exercised without a
//! network: [`fetch_entries`] downloads the bytes, [`parse_entries`] turns
//! bytes into entries.

use crate::models::FeedEntry;
use feed_rs::model::Entry;
use std::error::Error;
use tracing::{debug, info, instrument};

/// Download a feed and parse it into entries.
///
/// Non-2xx responses are errors; the caller decides whether a failing feed
/// is fatal (it is not, feeds are scanned independently).
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout)
/// * `url` - The feed URL to fetch
#[instrument(level = "info", skip(client), fields(%url))]
pub async fn fetch_entries(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("feed fetch failed: {status}").into());
    }
    let body = response.bytes().await?;
    debug!(bytes = body.len(), "Fetched feed body");

    let entries = parse_entries(url, &body)?;
    info!(count = entries.len(), "Parsed feed entries");
    Ok(entries)
}

/// Parse raw feed bytes into normalized entries.
///
/// # Errors
///
/// Returns an error when `feed-rs` cannot parse the payload as RSS or Atom.
pub fn parse_entries(feed_url: &str, raw: &[u8]) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let feed = feed_rs::parser::parse(raw)?;
    debug!(%feed_url, entries = feed.entries.len(), "Parsed feed document");
    Ok(feed.entries.iter().map(normalize_entry).collect())
}

/// Stable identifier for an entry, scoped to its feed.
///
/// Prefers the feed-declared ID, then the link, then a title+timestamp
/// fallback for feeds that provide neither. Scoping by feed URL keeps two
/// feeds that reuse the same guid from shadowing each other in the seen set.
pub fn dedup_key(feed_url: &str, entry: &FeedEntry) -> String {
    if !entry.id.trim().is_empty() {
        return format!("{feed_url}::id::{}", entry.id.trim());
    }
    if !entry.link.trim().is_empty() {
        return format!("{feed_url}::link::{}", entry.link.trim());
    }
    format!(
        "{feed_url}::fallback::{}::{}",
        entry.title.trim(),
        entry
            .published
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default()
    )
}

fn normalize_entry(entry: &Entry) -> FeedEntry {
    let link = entry
        .links
        .first()
        .map(|link| link.href.clone())
        .unwrap_or_default();
    let id = if entry.id.trim().is_empty() {
        link.clone()
    } else {
        entry.id.clone()
    };
    let title = entry
        .title
        .as_ref()
        .map(|text| text.content.clone())
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "(no title)".to_string());
    let summary = entry.summary.as_ref().map(|text| text.content.clone());
    let published = entry.published.or(entry.updated);

    FeedEntry {
        id,
        title,
        link,
        summary,
        published,
    }
}
