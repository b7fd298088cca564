// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::SophieError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Converts text into fixed-length vectors for similarity search.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Vector length this adapter produces, when known before the first call.
    fn dimensions(&self) -> Option<usize>;

    /// Generates one embedding per input text.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, SophieError>;
}
