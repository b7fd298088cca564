// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where feeds come from.
//!
//! [`HttpFeedSource`] downloads a feed over HTTP and parses RSS, Atom or
//! JSON Feed with `feed-rs`.

use std::time::Duration;

use async_trait::async_trait;
use sophie_core::error::SophieError;
use tracing::debug;

use crate::article::{Feed, FeedEntry};

/// Fetches and parses one feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Feed, SophieError>;
}

/// Feed source backed by `reqwest` and `feed-rs`.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedSource {
    /// Creates a source whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, SophieError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sophie/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SophieError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Feed, SophieError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        debug!(url, status = %status, "feed response received");
        if !status.is_success() {
            return Err(SophieError::Feed {
                url: url.to_string(),
                message: format!("server returned {status}"),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let parsed = feed_rs::parser::parse(&body[..]).map_err(|e| SophieError::Feed {
            url: url.to_string(),
            message: format!("malformed feed: {e}"),
        })?;

        Ok(Feed {
            title: parsed.title.map(|t| t.content),
            entries: parsed
                .entries
                .into_iter()
                .map(|entry| FeedEntry {
                    title: entry.title.map(|t| t.content),
                    link: entry.links.into_iter().next().map(|l| l.href),
                    summary: entry.summary.map(|t| t.content),
                })
                .collect(),
        })
    }
}

impl HttpFeedSource {
    fn request_error(&self, url: &str, e: reqwest::Error) -> SophieError {
        if e.is_timeout() {
            SophieError::Timeout {
                duration: self.timeout,
            }
        } else if e.is_connect() {
            SophieError::Unreachable {
                endpoint: url.to_string(),
                source: Box::new(e),
            }
        } else {
            SophieError::Feed {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}
