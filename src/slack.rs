//! Posting messages to a Slack incoming webhook.
//!
//! A webhook post is a single JSON `{"text": ...}` POST. Slack answers
//! `200 ok` on success and a non-2xx status with a short error body
//! (`invalid_payload`, `channel_is_archived`, ...) otherwise. There is no
//! retry here; a failed post is logged by the caller and the run moves on.

use crate::models::SlackPayload;
use crate::utils::truncate_for_log;
use std::error::Error;
use tracing::{debug, instrument};

/// A client bound to one incoming-webhook URL.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    webhook_url: String,
}

impl SlackClient {
    /// Bind a shared HTTP client to a webhook URL.
    pub fn new(http: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }

    /// POST plain text to the webhook.
    ///
    /// # Errors
    ///
    /// Any transport failure, or a non-2xx response; the error carries the
    /// status code and a preview of the response body.
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    pub async fn post_text(&self, text: &str) -> Result<(), Box<dyn Error>> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&SlackPayload { text })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Slack post accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(format!(
            "Slack post failed: {status} {}",
            truncate_for_log(&body, 200)
        )
        .into())
    }
}
