// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory for the Sophie assistant.
//!
//! Memories are short texts stored with an embedding vector in a SQLite
//! database. Recall ranks every memory in the collection by cosine
//! similarity to the query and keeps the best few above a threshold.
//! Stored memories are never modified or deleted.

pub mod embedder;
pub mod ids;
pub mod migrations;
pub mod store;
pub mod types;

pub use embedder::HashEmbedder;
pub use store::{DATABASE_FILE, DEFAULT_TOP_K, MemoryStore, StoreOptions};
pub use types::{Memory, MemoryId, cosine_similarity};
