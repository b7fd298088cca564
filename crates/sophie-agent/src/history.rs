// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered conversation history with the persona pinned at index 0.

use sophie_context::HistoryEntry;
use sophie_core::ChatMessage;

/// Conversation history.
///
/// Always starts with exactly one system message; nothing else in the
/// history can be a system message. The system message is replaced in
/// place, never appended.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new(system: String) -> Self {
        Self {
            entries: vec![HistoryEntry::conversation(ChatMessage::system(system))],
        }
    }

    /// Replaces the content of the system message.
    pub fn refresh_system(&mut self, system: String) {
        // entries is never empty
        if let Some(first) = self.entries.first_mut() {
            first.message.content = system;
        }
    }

    /// Drops every turn, leaving a single fresh system message.
    pub fn reset(&mut self, system: String) {
        self.entries.clear();
        self.entries
            .push(HistoryEntry::conversation(ChatMessage::system(system)));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries
            .push(HistoryEntry::conversation(ChatMessage::user(content)));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries
            .push(HistoryEntry::conversation(ChatMessage::assistant(content)));
    }

    pub fn push_error_notice(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry::error_notice(content));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn system(&self) -> &str {
        self.entries.first().map_or("", |e| e.content())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
