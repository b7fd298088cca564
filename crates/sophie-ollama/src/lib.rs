// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama adapters for Sophie.
//!
//! [`OllamaProvider`] answers chat turns through `/api/chat`;
//! [`OllamaEmbedder`] turns memories into vectors through `/api/embed`.
//! Both share one [`OllamaClient`] implementation.

pub mod client;
pub mod provider;
pub mod types;

pub use client::OllamaClient;
pub use provider::{OllamaEmbedder, OllamaProvider, model_available};
