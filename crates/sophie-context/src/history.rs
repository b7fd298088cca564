// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history entries.

use sophie_core::{ChatMessage, Role};

/// Where a history entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// A real turn, or an acknowledgement the session produced locally.
    Conversation,
    /// Synthetic error text. Shown to the user, never sent to the model.
    ErrorNotice,
}

/// A chat message plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub message: ChatMessage,
    pub origin: EntryOrigin,
}

impl HistoryEntry {
    pub fn conversation(message: ChatMessage) -> Self {
        Self {
            message,
            origin: EntryOrigin::Conversation,
        }
    }

    pub fn error_notice(content: impl Into<String>) -> Self {
        Self {
            message: ChatMessage::assistant(content),
            origin: EntryOrigin::ErrorNotice,
        }
    }

    pub fn role(&self) -> Role {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }

    pub fn is_error_notice(&self) -> bool {
        self.origin == EntryOrigin::ErrorNotice
    }
}
