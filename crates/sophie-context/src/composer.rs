// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles the message lists sent to the completion backend.

use std::sync::Arc;

use sophie_config::model::ContextConfig;
use sophie_core::{ChatMessage, Mood, Role};
use tracing::debug;

use crate::clock::Clock;
use crate::history::HistoryEntry;
use crate::persona::Persona;

/// How much history goes into a general-chat request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Keep the system message plus this many of the most recent entries.
    /// `None` sends everything.
    pub max_messages: Option<usize>,
}

impl HistoryWindow {
    pub fn from_config(config: &ContextConfig) -> Self {
        Self {
            max_messages: config.max_history_messages,
        }
    }
}

/// The instruction wrapped around formatted headlines.
pub fn news_instruction(formatted_news: &str) -> String {
    format!(
        "Here are some tech news headlines:\n{formatted_news}\n\n\
         Please summarize the key points, and tell me which story seems most significant, \
         without inventing events. Keep it concise, 1 - 2 paragraphs professional, but friendly."
    )
}

/// The one-off `[system, user]` pair for summarizing headlines.
pub fn news_request(
    persona: &Persona,
    mood: Mood,
    now: chrono::NaiveDateTime,
    formatted_news: &str,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(persona.system_message(mood, now)),
        ChatMessage::user(news_instruction(formatted_news)),
    ]
}

/// The general-chat message list for `history`.
///
/// Error notices are dropped. A leading system message is always kept; the
/// window applies to the entries after it.
pub fn outbound(history: &[HistoryEntry], window: HistoryWindow) -> Vec<ChatMessage> {
    let (system, rest) = match history.split_first() {
        Some((first, rest)) if first.role() == Role::System => (Some(first), rest),
        _ => (None, history),
    };

    let conversation: Vec<&HistoryEntry> = rest.iter().filter(|e| !e.is_error_notice()).collect();
    let skip = window
        .max_messages
        .map_or(0, |max| conversation.len().saturating_sub(max));

    let messages: Vec<ChatMessage> = system
        .into_iter()
        .chain(conversation.into_iter().skip(skip))
        .map(|e| e.message.clone())
        .collect();

    debug!(
        history = history.len(),
        outbound = messages.len(),
        windowed = skip,
        "assembled outbound messages"
    );
    messages
}

/// Persona, clock and window bundled for a session.
#[derive(Clone)]
pub struct PromptComposer {
    persona: Persona,
    clock: Arc<dyn Clock>,
    window: HistoryWindow,
}

impl PromptComposer {
    pub fn new(persona: Persona, clock: Arc<dyn Clock>, window: HistoryWindow) -> Self {
        Self {
            persona,
            clock,
            window,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// System message for `mood` at the clock's current time.
    pub fn system_message(&self, mood: Mood) -> String {
        self.persona.system_message(mood, self.clock.now())
    }

    pub fn news_request(&self, mood: Mood, formatted_news: &str) -> Vec<ChatMessage> {
        news_request(&self.persona, mood, self.clock.now(), formatted_news)
    }

    pub fn outbound(&self, history: &[HistoryEntry]) -> Vec<ChatMessage> {
        outbound(history, self.window)
    }
}
