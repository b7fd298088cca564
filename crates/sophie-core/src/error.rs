// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sophie assistant.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across adapter traits and core operations.
#[derive(Debug, Error)]
pub enum SophieError {
    /// Configuration errors (invalid TOML, out-of-range values, unknown keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// A mood name outside the closed mood set.
    #[error("invalid mood `{0}` (expected one of: neutral, cheerful, thoughtful, serious)")]
    InvalidMood(String),

    /// The memory store cannot be opened, read or written.
    #[error("memory store unavailable: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Embedding backend errors (bad dimensions, backend failure).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion backend errors (API failure, model not found, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single feed could not be fetched or parsed.
    #[error("feed unavailable ({url}): {message}")]
    Feed { url: String, message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The remote endpoint could not be reached at all.
    #[error("{endpoint} is unreachable: {source}")]
    Unreachable {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SophieError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SophieError::Storage {
            source: Box::new(err),
        }
    }

    /// Whether this error came from a completion call and should be shown as an error notice.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            SophieError::Provider { .. }
                | SophieError::Timeout { .. }
                | SophieError::Unreachable { .. }
        )
    }

    /// Whether this error means the memory store is no longer usable.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, SophieError::Storage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_failures_are_classified() {
        let provider = SophieError::Provider {
            message: "model not found".into(),
            source: None,
        };
        let timeout = SophieError::Timeout {
            duration: Duration::from_secs(5),
        };
        let unreachable = SophieError::Unreachable {
            endpoint: "http://localhost:11434".into(),
            source: Box::new(std::io::Error::other("connection refused")),
        };
        assert!(provider.is_completion_failure());
        assert!(timeout.is_completion_failure());
        assert!(unreachable.is_completion_failure());

        let storage = SophieError::storage(std::io::Error::other("disk gone"));
        assert!(!storage.is_completion_failure());
        assert!(storage.is_storage_failure());
    }

    #[test]
    fn timeout_and_unreachable_render_differently() {
        let timeout = SophieError::Timeout {
            duration: Duration::from_secs(2),
        }
        .to_string();
        let unreachable = SophieError::Unreachable {
            endpoint: "http://localhost:1".into(),
            source: Box::new(std::io::Error::other("refused")),
        }
        .to_string();
        assert!(timeout.contains("timed out"));
        assert!(unreachable.contains("unreachable"));
    }

    #[test]
    fn invalid_mood_names_the_value() {
        let err = SophieError::InvalidMood("grumpy".into());
        assert!(err.to_string().contains("`grumpy`"));
    }
}
