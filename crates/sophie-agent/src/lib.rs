// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for Sophie.
//!
//! Classifies user turns, keeps the conversation history and routes each
//! turn to the memory store, the news shaper or the completion backend.

pub mod command;
pub mod history;
pub mod session;

pub use command::{Command, classify};
pub use history::History;
pub use session::{
    CLEAR_NOTICE, MEMORY_UNAVAILABLE, Reply, ReplyKind, Session, SessionOptions, TurnOutcome,
};
