// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single conversation with Sophie.
//!
//! The session owns the history and the current mood. Each user turn is
//! classified and routed to the memory store, the news shaper or the model;
//! whatever the user should see comes back as a [`TurnOutcome`].

use std::sync::Arc;

use sophie_context::{HistoryEntry, PromptComposer};
use sophie_core::{
    ChatMessage, CompletionRequest, Mood, PluginAdapter, ProviderAdapter, SophieError,
};
use sophie_memory::MemoryStore;
use sophie_news::NewsShaper;
use tracing::{debug, info, warn};

use crate::command::{Command, classify};
use crate::history::History;

/// Shown after `/clear`.
pub const CLEAR_NOTICE: &str = "You have just wiped out the chat and Sophie's memory of it!";

/// Shown for remember/recall once memory is off.
pub const MEMORY_UNAVAILABLE: &str =
    "Memory is unavailable right now, so I can't remember or recall anything this session.";

/// How a reply should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// A memory was stored.
    Acknowledgement,
    /// Recalled memories.
    Memories,
    /// Recall found nothing.
    NothingRecalled,
    /// Formatted headlines.
    News,
    /// The model's reply.
    Assistant,
    /// Local information that is not part of the conversation.
    Notice,
    /// The model could not be reached.
    Error,
}

/// One piece of output from a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Everything a turn produced, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub replies: Vec<Reply>,
}

impl TurnOutcome {
    fn one(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            replies: vec![Reply::new(kind, text)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Model name passed with every completion request.
    pub model: String,
    /// Starting mood.
    pub mood: Mood,
    /// Memories returned per recall.
    pub top_k: usize,
}

/// A conversation: history, mood and the collaborators that serve it.
pub struct Session {
    provider: Arc<dyn ProviderAdapter>,
    memory: Option<Arc<MemoryStore>>,
    news: NewsShaper,
    composer: PromptComposer,
    history: History,
    mood: Mood,
    model: String,
    top_k: usize,
}

impl Session {
    /// Starts a session with memory features off.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        news: NewsShaper,
        composer: PromptComposer,
        options: SessionOptions,
    ) -> Self {
        let history = History::new(composer.system_message(options.mood));
        Self {
            provider,
            memory: None,
            news,
            composer,
            history,
            mood: options.mood,
            model: options.model,
            top_k: options.top_k,
        }
    }

    /// Enables remember and recall against `store`.
    pub fn with_memory(mut self, store: Arc<MemoryStore>) -> Self {
        self.memory = Some(store);
        self
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// False when no store was attached or the store failed mid-session.
    pub fn memory_enabled(&self) -> bool {
        self.memory.is_some()
    }

    /// Switches mood, regenerating only the system message.
    pub fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
        self.refresh_system();
        info!(mood = %mood, "mood changed");
    }

    /// Clears the conversation back to a single system message.
    pub fn reset(&mut self) {
        self.history.reset(self.composer.system_message(self.mood));
        info!("conversation reset");
    }

    /// Handles one user utterance.
    ///
    /// Blank input is ignored. Otherwise the user message is recorded first
    /// and the turn never fails: problems come back as notices or errors.
    pub async fn handle(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() {
            return TurnOutcome::default();
        }

        self.refresh_system();
        self.history.push_user(text);

        match classify(input) {
            Command::Remember(text) => self.remember(text).await,
            Command::Recall(keyword) => self.recall(keyword).await,
            Command::News => self.news().await,
            Command::Chat => self.chat().await,
        }
    }

    async fn remember(&mut self, text: &str) -> TurnOutcome {
        if text.is_empty() {
            return TurnOutcome::one(
                ReplyKind::Notice,
                "Tell me what to remember after \"remember\".",
            );
        }
        let Some(store) = self.memory.clone() else {
            return TurnOutcome::one(ReplyKind::Notice, MEMORY_UNAVAILABLE);
        };

        match store.add(text).await {
            Ok(id) => {
                debug!(id = %id, "remembered");
                let ack = format!("Got it! I'll remember that you said: {text}");
                self.history.push_assistant(ack.clone());
                TurnOutcome::one(ReplyKind::Acknowledgement, ack)
            }
            Err(e) => self.memory_failure(e),
        }
    }

    async fn recall(&mut self, keyword: &str) -> TurnOutcome {
        if keyword.is_empty() {
            return TurnOutcome::one(ReplyKind::Notice, "Tell me what to recall after \"recall\".");
        }
        let Some(store) = self.memory.clone() else {
            return TurnOutcome::one(ReplyKind::Notice, MEMORY_UNAVAILABLE);
        };

        match store.query(keyword, self.top_k).await {
            Ok(memories) if memories.is_empty() => TurnOutcome::one(
                ReplyKind::NothingRecalled,
                format!("I don't recall anything about {keyword}."),
            ),
            Ok(memories) => {
                let text = format!("I remember: {}", memories.join("<br>"));
                self.history.push_assistant(text.clone());
                TurnOutcome::one(ReplyKind::Memories, text)
            }
            Err(e) => self.memory_failure(e),
        }
    }

    /// The one-off summary request carries the session's current mood, not neutral.
    async fn news(&mut self) -> TurnOutcome {
        let headlines = self.news.headlines().await;
        let mut outcome = TurnOutcome::one(ReplyKind::News, headlines.clone());

        let messages = self.composer.news_request(self.mood, &headlines);
        let reply = self.complete(messages).await;
        outcome.replies.push(reply);
        outcome
    }

    async fn chat(&mut self) -> TurnOutcome {
        let messages = self.composer.outbound(self.history.entries());
        TurnOutcome {
            replies: vec![self.complete(messages).await],
        }
    }

    /// Sends `messages` to the model and records the reply (or the failure) in history.
    async fn complete(&mut self, messages: Vec<ChatMessage>) -> Reply {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
        };
        match self.provider.complete(request).await {
            Ok(response) => {
                self.history.push_assistant(response.content.clone());
                Reply::new(ReplyKind::Assistant, response.content)
            }
            Err(e) => {
                warn!(error = %e, provider = self.provider.name(), "completion failed");
                let notice = format!("(Error: Unable to get a response from the model. {e})");
                self.history.push_error_notice(notice.clone());
                Reply::new(ReplyKind::Error, notice)
            }
        }
    }

    /// Storage failures turn memory off for the rest of the session; other
    /// failures (such as an embedding backend hiccup) only affect this turn.
    fn memory_failure(&mut self, e: SophieError) -> TurnOutcome {
        if e.is_storage_failure() {
            warn!(error = %e, "memory store failed, disabling memory for this session");
            self.memory = None;
            TurnOutcome::one(ReplyKind::Notice, format!("{MEMORY_UNAVAILABLE} ({e})"))
        } else {
            warn!(error = %e, "memory operation failed");
            TurnOutcome::one(ReplyKind::Notice, format!("I couldn't do that just now: {e}"))
        }
    }

    fn refresh_system(&mut self) {
        self.history.refresh_system(self.composer.system_message(self.mood));
    }
}
