// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sophie - a personal assistant with long-term memory.
//!
//! This is the binary entry point: the interactive shell plus a handful of
//! one-shot subcommands.

mod app;
mod commands;
mod doctor;
mod render;
mod shell;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use sophie_config::{ConfigError, SophieConfig};
use sophie_core::{Mood, SophieError};
use sophie_memory::DEFAULT_TOP_K;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown at the configured level; everything else is capped at warn.
const LOG_TARGETS: &[&str] = &[
    "sophie",
    "sophie_agent",
    "sophie_config",
    "sophie_context",
    "sophie_memory",
    "sophie_news",
    "sophie_ollama",
];

/// Sophie - a personal assistant with long-term memory.
#[derive(Parser, Debug)]
#[command(name = "sophie", version, about, long_about = None)]
struct Cli {
    /// Load this file (plus SOPHIE_* overrides) instead of the usual hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Starting mood, overriding agent.mood.
    #[arg(long, global = true, value_name = "MOOD")]
    mood: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with Sophie (the default).
    Shell,
    /// Store a memory and print its id.
    Remember {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print the memories closest to a query.
    Recall {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum number of memories to print.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        limit: usize,
    },
    /// Print a sample of current technology headlines.
    News,
    /// Check configuration, memory store, Ollama and feeds.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Doctor { plain }) = cli.command {
        let failures = doctor::run_doctor(load_config(cli.config.as_deref()), plain).await;
        if failures > 0 {
            std::process::exit(1);
        }
        return;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            sophie_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<SophieConfig, Vec<ConfigError>> {
    match path {
        Some(path) => sophie_config::load_and_validate_path(path),
        None => sophie_config::load_and_validate(),
    }
}

async fn run(cli: Cli, config: SophieConfig) -> Result<(), SophieError> {
    let mood = Mood::parse(cli.mood.as_deref().unwrap_or(&config.agent.mood))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let session = app::build_session(&config, mood).await?;
            shell::run_shell(session, &config.agent.user_name).await?;
        }
        Commands::Remember { text } => {
            let store = memory_store(&config).await?;
            let id = commands::remember(&store, &text.join(" ")).await?;
            println!("{id}");
        }
        Commands::Recall { query, limit } => {
            let store = memory_store(&config).await?;
            let lines = commands::recall(&store, &query.join(" "), limit).await?;
            if lines.is_empty() {
                eprintln!("{}", "no matching memories".dimmed());
            }
            for line in lines {
                println!("{line}");
            }
        }
        Commands::News => {
            let shaper = app::build_news(&config)?;
            println!("{}", commands::news(&shaper).await);
        }
        Commands::Config => print!("{}", commands::config(&config)?),
        Commands::Doctor { .. } => {}
    }
    Ok(())
}

async fn memory_store(config: &SophieConfig) -> Result<sophie_memory::MemoryStore, SophieError> {
    if !config.memory.enabled {
        return Err(SophieError::Config(
            "memory is disabled (memory.enabled = false)".to_string(),
        ));
    }
    app::open_store(config).await
}

/// Filter directives used when `RUST_LOG` is unset.
fn default_directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    directives.push("warn".to_string());
    directives.join(",")
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Logs go to stderr so they never interleave with command output.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use serial_test::serial;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn shell_is_the_default() {
        let cli = Cli::try_parse_from(["sophie"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli =
            Cli::try_parse_from(["sophie", "shell", "--mood", "serious", "--config", "x.toml"])
                .unwrap();
        assert_eq!(cli.mood.as_deref(), Some("serious"));
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn remember_joins_words() {
        let cli = Cli::try_parse_from(["sophie", "remember", "I", "like", "tea"]).unwrap();
        match cli.command {
            Some(Commands::Remember { text }) => assert_eq!(text.join(" "), "I like tea"),
            other => panic!("expected remember, got {other:?}"),
        }
    }

    #[test]
    fn recall_limit_defaults_to_top_k() {
        let cli = Cli::try_parse_from(["sophie", "recall", "tea"]).unwrap();
        match cli.command {
            Some(Commands::Recall { limit, .. }) => assert_eq!(limit, DEFAULT_TOP_K),
            other => panic!("expected recall, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["sophie", "recall", "--limit", "7", "tea"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Recall { limit: 7, .. })));
    }

    #[test]
    fn remember_needs_text() {
        assert!(Cli::try_parse_from(["sophie", "remember"]).is_err());
    }

    #[tokio::test]
    async fn invalid_mood_override_is_rejected() {
        let cli = Cli::try_parse_from(["sophie", "--mood", "grumpy", "config"]).unwrap();
        let err = run(cli, SophieConfig::default()).await.unwrap_err();
        assert!(matches!(err, SophieError::InvalidMood(ref m) if m == "grumpy"));
    }

    #[tokio::test]
    async fn disabled_memory_refuses_remember() {
        let mut config = SophieConfig::default();
        config.memory.enabled = false;
        let cli = Cli::try_parse_from(["sophie", "remember", "tea"]).unwrap();
        assert!(matches!(
            run(cli, config).await,
            Err(SophieError::Config(_))
        ));
    }

    #[test]
    fn default_directives_cover_every_crate() {
        let directives = default_directives("DEBUG");
        assert!(directives.starts_with("sophie=debug,"));
        assert!(directives.contains("sophie_memory=debug"));
        assert!(directives.ends_with(",warn"));
    }

    #[test]
    #[serial]
    fn rust_log_wins_over_configured_level() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::set_var("RUST_LOG", "sophie_memory=trace") };
        let filter = log_filter("info").to_string();
        // SAFETY: see above.
        unsafe { std::env::remove_var("RUST_LOG") };
        assert!(filter.contains("sophie_memory=trace"), "{filter}");
        assert!(!filter.contains("sophie_agent"), "{filter}");
    }

    #[test]
    #[serial]
    fn configured_level_applies_without_rust_log() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::remove_var("RUST_LOG") };
        let filter = log_filter("error").to_string();
        assert!(filter.contains("sophie_agent=error"), "{filter}");
    }
}
