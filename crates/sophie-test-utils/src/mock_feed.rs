// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory feed source.

use std::collections::HashMap;

use async_trait::async_trait;
use sophie_core::SophieError;
use sophie_news::{Feed, FeedEntry, FeedSource};

/// Serves canned feeds by URL; any other URL fails like an unreachable feed.
#[derive(Debug, Clone, Default)]
pub struct MockFeedSource {
    feeds: HashMap<String, Feed>,
}

impl MockFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: impl Into<String>, feed: Feed) -> Self {
        self.feeds.insert(url.into(), feed);
        self
    }

    /// A feed titled `title` with `count` numbered entries.
    pub fn numbered_feed(title: &str, count: usize) -> Feed {
        Feed {
            title: Some(title.to_string()),
            entries: (0..count)
                .map(|i| FeedEntry {
                    title: Some(format!("{title} story {i}")),
                    link: Some(format!("https://example.com/{i}")),
                    summary: Some(format!("What happened in story {i}.")),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch(&self, url: &str) -> Result<Feed, SophieError> {
        self.feeds.get(url).cloned().ok_or_else(|| SophieError::Feed {
            url: url.to_string(),
            message: "no such feed".to_string(),
        })
    }
}
