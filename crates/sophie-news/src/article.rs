// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feed and article types.

/// One headline, copied out of a feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub link: String,
    /// The feed's title, or its URL when the feed has none.
    pub source: String,
    /// Entry summary; empty when the feed omits it.
    pub summary: String,
}

/// A parsed feed, reduced to the fields articles are built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

/// A single feed item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

impl Article {
    /// Builds an article from `entry`, attributing it to `feed_title` or else `url`.
    pub fn from_entry(entry: FeedEntry, feed_title: Option<&str>, url: &str) -> Self {
        Self {
            title: entry.title.unwrap_or_default(),
            link: entry.link.unwrap_or_default(),
            source: feed_title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(url)
                .to_string(),
            summary: entry.summary.unwrap_or_default(),
        }
    }
}
