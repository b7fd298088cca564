// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Technology headlines for Sophie.
//!
//! Fetches a handful of RSS/Atom feeds, samples a few entries at random
//! and renders them into a block of text for display and summarization.

pub mod article;
pub mod shaper;
pub mod source;

pub use article::{Article, Feed, FeedEntry};
pub use shaper::{NO_ARTICLES, NewsOptions, NewsShaper, fetch_articles, format, sample};
pub use source::{FeedSource, HttpFeedSource};
