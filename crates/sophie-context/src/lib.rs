// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for Sophie.
//!
//! Builds the persona system message from a mood and the current time,
//! and turns conversation history into the message lists handed to the
//! completion backend.

pub mod clock;
pub mod composer;
pub mod history;
pub mod persona;

pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::{HistoryWindow, PromptComposer, news_instruction, news_request, outbound};
pub use history::{EntryOrigin, HistoryEntry};
pub use persona::{Persona, TIME_FORMAT};
