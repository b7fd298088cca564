// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the runtime pieces from a validated configuration.

use std::sync::Arc;
use std::time::Duration;

use sophie_agent::{Session, SessionOptions};
use sophie_config::SophieConfig;
use sophie_config::model::EmbedderKind;
use sophie_context::{HistoryWindow, Persona, PromptComposer, SystemClock};
use sophie_core::{EmbeddingAdapter, Mood, SophieError};
use sophie_memory::{HashEmbedder, MemoryStore, StoreOptions};
use sophie_news::{HttpFeedSource, NewsOptions, NewsShaper};
use sophie_ollama::{OllamaEmbedder, OllamaProvider};
use tracing::info;

/// The embedding backend selected by `memory.embedder`.
pub fn build_embedder(config: &SophieConfig) -> Result<Arc<dyn EmbeddingAdapter>, SophieError> {
    Ok(match config.memory.embedder {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(config.memory.dimensions)),
        EmbedderKind::Ollama => Arc::new(OllamaEmbedder::new(&config.ollama)?),
    })
}

/// Opens the configured memory store.
pub async fn open_store(config: &SophieConfig) -> Result<MemoryStore, SophieError> {
    let embedder = build_embedder(config)?;
    let options = StoreOptions {
        collection: config.storage.collection.clone(),
        similarity_threshold: config.memory.similarity_threshold as f32,
    };
    MemoryStore::open(&config.storage.memory_path, embedder, options).await
}

pub fn build_news(config: &SophieConfig) -> Result<NewsShaper, SophieError> {
    let source = HttpFeedSource::new(Duration::from_secs(config.news.timeout_secs))?;
    Ok(NewsShaper::new(
        Arc::new(source),
        NewsOptions {
            feeds: config.news.feeds.clone(),
            per_feed_limit: config.news.per_feed_limit,
            sample_limit: config.news.sample_limit,
        },
    ))
}

pub fn build_composer(config: &SophieConfig) -> PromptComposer {
    PromptComposer::new(
        Persona::from_config(&config.agent),
        Arc::new(SystemClock),
        HistoryWindow::from_config(&config.context),
    )
}

/// Wires a session against Ollama, the live feeds and (when enabled) the
/// memory store. A store that cannot be opened is fatal.
pub async fn build_session(config: &SophieConfig, mood: Mood) -> Result<Session, SophieError> {
    let provider = Arc::new(OllamaProvider::new(&config.ollama)?);
    let session = Session::new(
        provider,
        build_news(config)?,
        build_composer(config),
        SessionOptions {
            model: config.ollama.model.clone(),
            mood,
            top_k: config.memory.top_k,
        },
    );

    if !config.memory.enabled {
        info!("memory disabled by configuration");
        return Ok(session);
    }

    let store = open_store(config).await?;
    Ok(session.with_memory(Arc::new(store)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> SophieConfig {
        let mut config = SophieConfig::default();
        config.storage.memory_path = dir.join("memory").display().to_string();
        config
    }

    #[tokio::test]
    async fn session_gets_memory_when_store_opens() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let session = build_session(&config, Mood::Neutral).await.unwrap();
        assert!(session.memory_enabled());
        assert!(dir.path().join("memory").join(sophie_memory::DATABASE_FILE).exists());
    }

    #[tokio::test]
    async fn disabled_memory_skips_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.memory.enabled = false;

        let session = build_session(&config, Mood::Cheerful).await.unwrap();
        assert!(!session.memory_enabled());
        assert_eq!(session.mood(), Mood::Cheerful);
        assert!(!dir.path().join("memory").exists());
    }

    #[tokio::test]
    async fn unopenable_store_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("memory");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = config_in(dir.path());

        let err = build_session(&config, Mood::Neutral).await.err().unwrap();
        assert!(err.is_storage_failure(), "{err}");
    }

    #[test]
    fn embedder_follows_configuration() {
        let mut config = SophieConfig::default();
        config.memory.dimensions = 64;
        let embedder = build_embedder(&config).unwrap();
        assert_eq!(embedder.dimensions(), Some(64));

        config.memory.embedder = EmbedderKind::Ollama;
        let embedder = build_embedder(&config).unwrap();
        assert_eq!(embedder.dimensions(), None);
    }
}
