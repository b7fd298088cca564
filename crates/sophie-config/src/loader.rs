// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sophie.toml` > `~/.config/sophie/sophie.toml` > `/etc/sophie/sophie.toml`
//! with environment variable overrides via `SOPHIE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SophieConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/sophie/sophie.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sophie.toml";

/// Sections that `SOPHIE_<SECTION>_<KEY>` variables map into.
const ENV_SECTIONS: &[&str] = &["agent", "ollama", "storage", "memory", "news", "context"];

/// Location of the per-user configuration file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sophie").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sophie/sophie.toml` (system-wide)
/// 3. `~/.config/sophie/sophie.toml` (user XDG config)
/// 4. `./sophie.toml` (local directory)
/// 5. `SOPHIE_*` environment variables
pub fn load_config() -> Result<SophieConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SophieConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SophieConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SophieConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SophieConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SophieConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` with explicit section prefixes instead of `Env::split("_")`,
/// since key names contain underscores: `SOPHIE_OLLAMA_TIMEOUT_SECS` must map to
/// `ollama.timeout_secs`, not `ollama.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("SOPHIE_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("ollama_model"), "ollama.model");
        assert_eq!(map_env_key("ollama_timeout_secs"), "ollama.timeout_secs");
        assert_eq!(map_env_key("memory_top_k"), "memory.top_k");
        assert_eq!(
            map_env_key("context_max_history_messages"),
            "context.max_history_messages"
        );
        assert_eq!(map_env_key("agent_user_name"), "agent.user_name");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("telemetry_enabled"), "telemetry_enabled");
    }
}
