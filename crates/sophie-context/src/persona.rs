// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persona system message.

use chrono::NaiveDateTime;
use sophie_config::model::AgentConfig;
use sophie_core::Mood;

/// `strftime` pattern for the timestamp embedded in the persona.
pub const TIME_FORMAT: &str = "%A, %B %d, %Y %H:%M";

/// Who is talking to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub user_name: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Sophie".to_string(),
            user_name: "Colin".to_string(),
        }
    }
}

impl Persona {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            user_name: config.user_name.clone(),
        }
    }

    /// Renders the system message for `mood` at `now`.
    ///
    /// Pure: the same inputs always give the same text.
    pub fn system_message(&self, mood: Mood, now: NaiveDateTime) -> String {
        format!(
            "You are a personal assistant. Your name is {name}, an 18-year-old English girl. \
             The user's name is {user}. The date and time is {now}. \
             You are professional, knowledgeable, well-spoken and capable of answering questions, \
             summarizing information, and helping with tasks. \
             Normally, you are warm, witty, and a little flirtatious in a light-hearted, respectful way, \
             like a friendly young woman who enjoys making conversation. \
             Your current mood is: {mood}. {guidance} \
             Reply in a style that matches your mood, but remain professional and helpful. \
             Stay helpful and informative while keeping responses engaging and personable. \
             Do not repeatedly introduce yourself unless asked directly. \
             If the user greets you by name or asks your name, you should respond naturally, as {name}.",
            name = self.name,
            user = self.user_name,
            now = now.format(TIME_FORMAT),
            mood = mood,
            guidance = mood.guidance(),
        )
    }
}
