// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot subcommands: remember, recall, news and config.

use sophie_config::SophieConfig;
use sophie_core::SophieError;
use sophie_memory::{MemoryId, MemoryStore};
use sophie_news::NewsShaper;

use crate::render::to_plain_text;

pub async fn remember(store: &MemoryStore, text: &str) -> Result<MemoryId, SophieError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SophieError::Config(
            "nothing to remember: usage is `sophie remember <TEXT...>`".to_string(),
        ));
    }
    store.add(text).await
}

/// Matching memories, best first, as printable lines.
pub async fn recall(
    store: &MemoryStore,
    query: &str,
    limit: usize,
) -> Result<Vec<String>, SophieError> {
    Ok(store
        .query_scored(query.trim(), limit)
        .await?
        .into_iter()
        .map(|(memory, score)| format!("{score:.3}  {}", memory.text))
        .collect())
}

pub async fn news(shaper: &NewsShaper) -> String {
    to_plain_text(&shaper.headlines().await)
}

/// The effective configuration as TOML.
pub fn config(config: &SophieConfig) -> Result<String, SophieError> {
    toml::to_string_pretty(config)
        .map_err(|e| SophieError::Internal(format!("failed to render configuration: {e}")))
}
