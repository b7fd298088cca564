// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as mood names, URL schemes and non-zero limits.

use sophie_core::Mood;

use crate::diagnostic::ConfigError;
use crate::model::SophieConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SophieConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if let Err(e) = Mood::parse(&config.agent.mood) {
        errors.push(invalid(format!("agent.mood: {e}")));
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.to_ascii_lowercase().as_str()) {
        errors.push(invalid(format!(
            "agent.log_level `{}` is not one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    for (key, value) in [
        ("agent.name", &config.agent.name),
        ("agent.user_name", &config.agent.user_name),
        ("ollama.model", &config.ollama.model),
        ("ollama.embedding_model", &config.ollama.embedding_model),
        ("storage.memory_path", &config.storage.memory_path),
        ("storage.collection", &config.storage.collection),
    ] {
        if value.trim().is_empty() {
            errors.push(invalid(format!("{key} must not be empty")));
        }
    }

    if !is_http_url(&config.ollama.base_url) {
        errors.push(invalid(format!(
            "ollama.base_url `{}` must start with http:// or https://",
            config.ollama.base_url
        )));
    }

    for (i, feed) in config.news.feeds.iter().enumerate() {
        if !is_http_url(feed) {
            errors.push(invalid(format!(
                "news.feeds[{i}] `{feed}` must start with http:// or https://"
            )));
        }
    }

    for (key, value) in [
        ("memory.top_k", config.memory.top_k as u64),
        ("news.per_feed_limit", config.news.per_feed_limit as u64),
        ("news.sample_limit", config.news.sample_limit as u64),
        ("ollama.timeout_secs", config.ollama.timeout_secs),
        ("news.timeout_secs", config.news.timeout_secs),
    ] {
        if value == 0 {
            errors.push(invalid(format!("{key} must be at least 1")));
        }
    }

    let threshold = config.memory.similarity_threshold;
    if !(-1.0..=1.0).contains(&threshold) {
        errors.push(invalid(format!(
            "memory.similarity_threshold must be between -1.0 and 1.0, got {threshold}"
        )));
    }

    if config.memory.dimensions < 8 {
        errors.push(invalid(format!(
            "memory.dimensions must be at least 8, got {}",
            config.memory.dimensions
        )));
    }

    if config.context.max_history_messages == Some(0) {
        errors.push(invalid(
            "context.max_history_messages must be at least 1 when set".to_string(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation { message }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&SophieConfig::default()).is_ok());
    }

    #[test]
    fn bad_mood_is_rejected() {
        let mut config = SophieConfig::default();
        config.agent.mood = "grumpy".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("grumpy"));
    }

    #[test]
    fn collects_every_error() {
        let mut config = SophieConfig::default();
        config.ollama.model = "  ".into();
        config.memory.top_k = 0;
        config.news.feeds.push("ftp://example.com/feed".into());
        config.context.max_history_messages = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {errors:?}");
    }

    #[test]
    fn threshold_out_of_range() {
        let mut config = SophieConfig::default();
        config.memory.similarity_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }
}
