// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for completion backends.

use async_trait::async_trait;

use crate::error::SophieError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// A language-model backend mapping an ordered message list to a reply.
///
/// Implementations surface network failures as [`SophieError::Unreachable`],
/// expired deadlines as [`SophieError::Timeout`] and everything else the
/// backend rejects as [`SophieError::Provider`].
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SophieError>;
}
