// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session testing.
//!
//! `TestHarness` wires a [`Session`] to a mock provider, a mock feed source,
//! a memory store in a temporary directory and a fixed clock.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sophie_agent::{Session, SessionOptions, TurnOutcome};
use sophie_context::{FixedClock, HistoryWindow, Persona, PromptComposer};
use sophie_core::{Mood, SophieError};
use sophie_memory::{HashEmbedder, MemoryStore, StoreOptions};
use sophie_news::{NewsOptions, NewsShaper};
use tempfile::TempDir;

use crate::mock_feed::MockFeedSource;
use crate::mock_provider::MockProvider;

/// Vector length for the harness embedder. Large enough that unrelated
/// words rarely share a bucket.
pub const HARNESS_DIMENSIONS: usize = 4096;

/// Model name sent with every harness request.
pub const HARNESS_MODEL: &str = "test-model";

/// The instant the harness clock starts at: Saturday, March 15, 2025 10:30.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 15)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .unwrap_or_default()
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    feeds: MockFeedSource,
    feed_urls: Vec<String>,
    mood: Mood,
    window: HistoryWindow,
    memory: bool,
    top_k: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            feeds: MockFeedSource::new(),
            feed_urls: Vec::new(),
            mood: Mood::Neutral,
            window: HistoryWindow::default(),
            memory: true,
            top_k: 3,
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Serve `feeds` and ask for `urls`, in order.
    pub fn with_feeds(mut self, feeds: MockFeedSource, urls: Vec<String>) -> Self {
        self.feeds = feeds;
        self.feed_urls = urls;
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }

    pub fn with_history_window(mut self, max_messages: usize) -> Self {
        self.window = HistoryWindow {
            max_messages: Some(max_messages),
        };
        self
    }

    /// Start the session with memory features off.
    pub fn without_memory(mut self) -> Self {
        self.memory = false;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SophieError> {
        let temp_dir = TempDir::new().map_err(SophieError::storage)?;
        let store = Arc::new(
            MemoryStore::open(
                temp_dir.path(),
                Arc::new(HashEmbedder::new(HARNESS_DIMENSIONS)),
                StoreOptions::default(),
            )
            .await?,
        );

        let provider = Arc::new(MockProvider::with_responses(self.responses));
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let composer = PromptComposer::new(Persona::default(), clock.clone(), self.window);
        let news = NewsShaper::new(
            Arc::new(self.feeds),
            NewsOptions {
                feeds: self.feed_urls,
                per_feed_limit: 5,
                sample_limit: 5,
            },
        );

        let mut session = Session::new(
            provider.clone(),
            news,
            composer.clone(),
            SessionOptions {
                model: HARNESS_MODEL.to_string(),
                mood: self.mood,
                top_k: self.top_k,
            },
        );
        if self.memory {
            session = session.with_memory(store.clone());
        }

        Ok(TestHarness {
            session,
            provider,
            store,
            clock,
            composer,
            _temp_dir: temp_dir,
        })
    }
}

/// A session plus handles on every collaborator behind it.
pub struct TestHarness {
    pub session: Session,
    pub provider: Arc<MockProvider>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    /// Composer sharing the session's persona and clock, for expected values.
    pub composer: PromptComposer,
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default settings.
    pub async fn new() -> Result<Self, SophieError> {
        Self::builder().build().await
    }

    /// Drive one user turn through the session.
    pub async fn send(&mut self, input: &str) -> TurnOutcome {
        self.session.handle(input).await
    }

    /// The system message the session should currently hold for `mood`.
    pub fn expected_system(&self, mood: Mood) -> String {
        self.composer.system_message(mood)
    }
}
