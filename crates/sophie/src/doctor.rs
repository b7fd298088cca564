// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sophie doctor` command implementation.
//!
//! Checks the configuration, the memory store, the Ollama server and every
//! configured news feed, printing one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use colored::Colorize;
use sophie_config::model::EmbedderKind;
use sophie_config::{ConfigError, SophieConfig};
use sophie_core::{HealthStatus, PluginAdapter, SophieError};
use sophie_news::{FeedSource, HttpFeedSource};
use sophie_ollama::{OllamaEmbedder, OllamaProvider};

use crate::app;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but something needs attention.
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(
        name: impl Into<String>,
        status: CheckStatus,
        message: impl Into<String>,
        start: Instant,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Runs every check and prints the report. Returns the number of failed checks.
pub async fn run_doctor(loaded: Result<SophieConfig, Vec<ConfigError>>, plain: bool) -> usize {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = match loaded {
        Ok(config) => run_checks(&config).await,
        Err(errors) => {
            sophie_config::render_errors(&errors);
            vec![config_failure(&errors)]
        }
    };

    println!();
    println!("  sophie doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    failures
}

pub async fn run_checks(config: &SophieConfig) -> Vec<CheckResult> {
    let mut results = vec![check_config(config)];
    results.push(check_memory_store(config).await);
    results.push(check_ollama(config).await);
    if config.memory.enabled && config.memory.embedder == EmbedderKind::Ollama {
        results.push(check_embedding_model(config).await);
    }
    results.extend(check_feeds(config).await);
    results
}

pub fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

fn config_failure(errors: &[ConfigError]) -> CheckResult {
    CheckResult::new(
        "Configuration",
        CheckStatus::Fail,
        format!("{} error(s)", errors.len()),
        Instant::now(),
    )
}

fn check_config(config: &SophieConfig) -> CheckResult {
    let start = Instant::now();
    CheckResult::new(
        "Configuration",
        CheckStatus::Pass,
        format!(
            "valid (mood {}, model {}, {} feed(s))",
            config.agent.mood,
            config.ollama.model,
            config.news.feeds.len()
        ),
        start,
    )
}

async fn check_memory_store(config: &SophieConfig) -> CheckResult {
    let start = Instant::now();
    if !config.memory.enabled {
        return CheckResult::new(
            "Memory store",
            CheckStatus::Warn,
            "disabled in configuration",
            start,
        );
    }

    let store = match app::open_store(config).await {
        Ok(store) => store,
        Err(e) => return CheckResult::new("Memory store", CheckStatus::Fail, e.to_string(), start),
    };
    match store.len().await {
        Ok(count) => CheckResult::new(
            "Memory store",
            CheckStatus::Pass,
            format!("{count} memories in {}", store.path().display()),
            start,
        ),
        Err(e) => CheckResult::new("Memory store", CheckStatus::Fail, e.to_string(), start),
    }
}

fn health_result(
    name: &str,
    health: Result<HealthStatus, SophieError>,
    ok: String,
    start: Instant,
) -> CheckResult {
    match health {
        Ok(HealthStatus::Healthy) => CheckResult::new(name, CheckStatus::Pass, ok, start),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new(name, CheckStatus::Warn, reason, start)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new(name, CheckStatus::Fail, reason, start)
        }
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_ollama(config: &SophieConfig) -> CheckResult {
    let start = Instant::now();
    let health = match OllamaProvider::new(&config.ollama) {
        Ok(provider) => provider.health_check().await,
        Err(e) => Err(e),
    };
    health_result(
        "Ollama",
        health,
        format!("{} at {}", config.ollama.model, config.ollama.base_url),
        start,
    )
}

async fn check_embedding_model(config: &SophieConfig) -> CheckResult {
    let start = Instant::now();
    let health = match OllamaEmbedder::new(&config.ollama) {
        Ok(embedder) => embedder.health_check().await,
        Err(e) => Err(e),
    };
    health_result(
        "Embedding model",
        health,
        config.ollama.embedding_model.clone(),
        start,
    )
}

/// Feed failures are warnings: news degrades gracefully.
async fn check_feeds(config: &SophieConfig) -> Vec<CheckResult> {
    let start = Instant::now();
    if config.news.feeds.is_empty() {
        return vec![CheckResult::new("Feeds", CheckStatus::Warn, "no feeds configured", start)];
    }

    let source = match HttpFeedSource::new(Duration::from_secs(config.news.timeout_secs)) {
        Ok(source) => source,
        Err(e) => return vec![CheckResult::new("Feeds", CheckStatus::Fail, e.to_string(), start)],
    };

    let mut results = Vec::with_capacity(config.news.feeds.len());
    for (i, url) in config.news.feeds.iter().enumerate() {
        let start = Instant::now();
        let name = format!("Feed {}", i + 1);
        let result = match source.fetch(url).await {
            Ok(feed) => CheckResult::new(
                name,
                CheckStatus::Pass,
                format!(
                    "{} ({} entries)",
                    feed.title.as_deref().unwrap_or(url.as_str()),
                    feed.entries.len()
                ),
                start,
            ),
            Err(e) => CheckResult::new(name, CheckStatus::Warn, e.to_string(), start),
        };
        results.push(result);
    }
    results
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Chips Daily</title>
<item><title>Faster chips</title><link>https://example.com/1</link></item>
</channel></rss>"#;

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "phi3:latest"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        server
    }

    fn config(server: &MockServer, dir: &std::path::Path) -> SophieConfig {
        let mut config = SophieConfig::default();
        config.ollama.base_url = server.uri();
        config.ollama.timeout_secs = 5;
        config.storage.memory_path = dir.join("memory").display().to_string();
        config.news.feeds = vec![
            format!("{}/feed.xml", server.uri()),
            format!("{}/gone.xml", server.uri()),
        ];
        config.news.timeout_secs = 5;
        config
    }

    fn status_of<'a>(results: &'a [CheckResult], name: &str) -> &'a CheckResult {
        results
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no check named {name}"))
    }

    #[tokio::test]
    async fn healthy_setup_passes_and_dead_feed_warns() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();
        let results = run_checks(&config(&server, dir.path())).await;

        assert_eq!(status_of(&results, "Configuration").status, CheckStatus::Pass);
        assert_eq!(status_of(&results, "Memory store").status, CheckStatus::Pass);
        assert!(status_of(&results, "Memory store").message.starts_with("0 memories"));
        assert_eq!(status_of(&results, "Ollama").status, CheckStatus::Pass);

        let feed = status_of(&results, "Feed 1");
        assert_eq!(feed.status, CheckStatus::Pass);
        assert_eq!(feed.message, "Chips Daily (1 entries)");
        assert_eq!(status_of(&results, "Feed 2").status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn missing_model_is_a_warning() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&server, dir.path());
        config.ollama.model = "llama3".to_string();

        let results = run_checks(&config).await;
        let ollama = status_of(&results, "Ollama");
        assert_eq!(ollama.status, CheckStatus::Warn);
        assert!(ollama.message.contains("ollama pull llama3"));
    }

    #[tokio::test]
    async fn unreachable_ollama_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SophieConfig::default();
        config.ollama.base_url = "http://127.0.0.1:9".to_string();
        config.ollama.timeout_secs = 2;
        config.storage.memory_path = dir.path().join("memory").display().to_string();
        config.news.feeds.clear();

        let results = run_checks(&config).await;
        assert_eq!(status_of(&results, "Ollama").status, CheckStatus::Fail);
        assert_eq!(status_of(&results, "Feeds").status, CheckStatus::Warn);
    }

    #[tokio::test]
    async fn ollama_embedder_gets_its_own_check() {
        let server = server().await;
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&server, dir.path());
        config.memory.embedder = EmbedderKind::Ollama;
        config.memory.enabled = false;
        assert!(!run_checks(&config).await.iter().any(|r| r.name == "Embedding model"));

        config.memory.enabled = true;
        let results = run_checks(&config).await;
        assert_eq!(status_of(&results, "Embedding model").status, CheckStatus::Warn);
        assert_eq!(status_of(&results, "Memory store").status, CheckStatus::Pass);
    }

    #[test]
    fn plain_lines_use_text_tags() {
        let result = CheckResult {
            name: "Ollama".to_string(),
            status: CheckStatus::Fail,
            message: "connection refused".to_string(),
            duration: Duration::from_millis(12),
        };
        assert_eq!(
            render_line(&result, false),
            "    [FAIL] Ollama               connection refused (12ms)"
        );
    }
}
