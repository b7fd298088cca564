// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a list of feeds into a short block of headlines.

use std::sync::Arc;

use futures::future::join_all;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::article::Article;
use crate::source::FeedSource;

/// Text returned by [`format`] when there is nothing to show.
pub const NO_ARTICLES: &str = "No articles found.";

/// Fetches every feed concurrently, keeping at most `per_feed_limit` entries
/// from each, in feed order.
///
/// A feed that cannot be fetched or parsed is logged and contributes
/// nothing; this never fails.
pub async fn fetch_articles(
    source: &dyn FeedSource,
    feeds: &[String],
    per_feed_limit: usize,
) -> Vec<Article> {
    let fetches = feeds.iter().map(|url| async move {
        match source.fetch(url).await {
            Ok(feed) => {
                let title = feed.title.as_deref();
                feed.entries
                    .into_iter()
                    .take(per_feed_limit)
                    .map(|entry| Article::from_entry(entry, title, url))
                    .collect::<Vec<_>>()
            }
            Err(e) => {
                warn!(url = %url, error = %e, "feed unavailable, skipping");
                Vec::new()
            }
        }
    });

    let articles: Vec<Article> = join_all(fetches).await.into_iter().flatten().collect();
    debug!(feeds = feeds.len(), articles = articles.len(), "feeds fetched");
    articles
}

/// Picks `min(limit, articles.len())` articles uniformly at random, in random order.
pub fn sample(articles: Vec<Article>, limit: usize) -> Vec<Article> {
    sample_with(articles, limit, &mut rand::thread_rng())
}

/// [`sample`] with a caller-supplied random source.
pub fn sample_with<R: Rng + ?Sized>(
    mut articles: Vec<Article>,
    limit: usize,
    rng: &mut R,
) -> Vec<Article> {
    articles.shuffle(rng);
    articles.truncate(limit);
    articles
}

/// Renders articles as the HTML-ish block shown to the user and fed to the model.
pub fn format(articles: &[Article]) -> String {
    if articles.is_empty() {
        return NO_ARTICLES.to_string();
    }
    articles
        .iter()
        .map(|a| {
            format!(
                "<b>{}</b><br>{}<br>{}<br><br>{}<br><br>",
                a.title, a.link, a.source, a.summary
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Feeds and limits used by [`NewsShaper::headlines`].
#[derive(Debug, Clone)]
pub struct NewsOptions {
    pub feeds: Vec<String>,
    pub per_feed_limit: usize,
    pub sample_limit: usize,
}

/// A feed source bundled with the configured feeds and limits.
#[derive(Clone)]
pub struct NewsShaper {
    source: Arc<dyn FeedSource>,
    options: NewsOptions,
}

impl NewsShaper {
    pub fn new(source: Arc<dyn FeedSource>, options: NewsOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &NewsOptions {
        &self.options
    }

    /// Fetches all feeds and returns a random sample of their articles.
    pub async fn sampled_articles(&self) -> Vec<Article> {
        let articles = fetch_articles(
            self.source.as_ref(),
            &self.options.feeds,
            self.options.per_feed_limit,
        )
        .await;
        sample(articles, self.options.sample_limit)
    }

    /// Fetch, sample and format in one go.
    pub async fn headlines(&self) -> String {
        format(&self.sampled_articles().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn article(n: usize) -> Article {
        Article {
            title: format!("Title {n}"),
            link: format!("https://example.com/{n}"),
            source: "Example".into(),
            summary: format!("Summary {n}"),
        }
    }

    #[test]
    fn empty_list_formats_as_sentinel() {
        assert_eq!(format(&[]), "No articles found.");
    }

    #[test]
    fn single_article_block() {
        assert_eq!(
            format(&[article(1)]),
            "<b>Title 1</b><br>https://example.com/1<br>Example<br><br>Summary 1<br><br>"
        );
    }

    #[test]
    fn blocks_are_joined_with_break() {
        let text = format(&[article(1), article(2)]);
        assert!(text.contains("Summary 1<br><br><br><b>Title 2</b>"));
    }

    #[test]
    fn sample_is_bounded_by_limit_and_len() {
        let articles: Vec<_> = (0..10).map(article).collect();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_with(articles.clone(), 5, &mut rng).len(), 5);
        assert_eq!(sample_with(articles.clone(), 50, &mut rng).len(), 10);
        assert!(sample_with(articles, 0, &mut rng).is_empty());
    }

    #[test]
    fn sample_draws_distinct_articles() {
        let articles: Vec<_> = (0..10).map(article).collect();
        let picked = sample(articles.clone(), 6);
        let mut titles: Vec<_> = picked.iter().map(|a| a.title.clone()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), 6);
        assert!(picked.iter().all(|a| articles.contains(a)));
    }
}
