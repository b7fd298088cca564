// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sophie assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Sophie configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SophieConfig {
    /// Persona and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Ollama server settings (completion and optional embeddings).
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Where memories live on disk.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory retrieval settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Technology news feeds.
    #[serde(default)]
    pub news: NewsConfig,

    /// Outbound context assembly.
    #[serde(default)]
    pub context: ContextConfig,
}

/// Persona and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the assistant, used in the persona.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// How the assistant addresses the user.
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Mood a new session starts in.
    #[serde(default = "default_mood")]
    pub mood: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            user_name: default_user_name(),
            mood: default_mood(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "Sophie".to_string()
}

fn default_user_name() -> String {
    "Colin".to_string()
}

fn default_mood() -> String {
    "neutral".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Ollama server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama HTTP API.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    /// Chat model used for completions.
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Model used when `memory.embedder = "ollama"`.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_ollama_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_chat_model(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_ollama_timeout(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_chat_model() -> String {
    "phi3".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_ollama_timeout() -> u64 {
    120
}

/// Memory persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the memory database.
    #[serde(default = "default_memory_path")]
    pub memory_path: String,

    /// Name of the memory collection inside the database.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_path: default_memory_path(),
            collection: default_collection(),
        }
    }
}

fn default_memory_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sophie").join("sophie_memory"))
        .unwrap_or_else(|| PathBuf::from("sophie_memory"))
        .to_string_lossy()
        .into_owned()
}

fn default_collection() -> String {
    "sophie_memories".to_string()
}

/// Which backend turns memory text into vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Local feature-hashing embedder; offline and deterministic.
    #[default]
    Hash,
    /// Ollama `/api/embed` with `ollama.embedding_model`.
    Ollama,
}

/// Memory retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable remember/recall. When false the session answers with a notice.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// Number of memories returned by a recall.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum cosine similarity for a memory to count as recalled.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Embedding backend.
    #[serde(default)]
    pub embedder: EmbedderKind,

    /// Vector length for the hash embedder.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            top_k: default_top_k(),
            similarity_threshold: default_similarity_threshold(),
            embedder: EmbedderKind::default(),
            dimensions: default_dimensions(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_top_k() -> usize {
    3
}

fn default_similarity_threshold() -> f64 {
    0.1
}

fn default_dimensions() -> usize {
    384
}

/// News feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NewsConfig {
    /// RSS/Atom feed URLs.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<String>,

    /// Maximum entries taken from each feed.
    #[serde(default = "default_news_limit")]
    pub per_feed_limit: usize,

    /// Articles sampled across all feeds.
    #[serde(default = "default_news_limit")]
    pub sample_limit: usize,

    /// Per-feed request timeout in seconds.
    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            per_feed_limit: default_news_limit(),
            sample_limit: default_news_limit(),
            timeout_secs: default_news_timeout(),
        }
    }
}

fn default_feeds() -> Vec<String> {
    [
        "http://feeds.arstechnica.com/arstechnica/technology-lab",
        "https://www.theverge.com/rss/index.xml",
        "https://www.wired.com/feed/category/gear/latest/rss",
        "https://rss.nytimes.com/services/xml/rss/nyt/Technology.xml",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_news_limit() -> usize {
    5
}

fn default_news_timeout() -> u64 {
    15
}

/// Outbound context assembly configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Keep only the system message plus this many recent entries in
    /// completion requests. Unset sends the whole history.
    #[serde(default)]
    pub max_history_messages: Option<usize>,
}
