// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion and embedding adapters backed by [`OllamaClient`].

use std::time::Duration;

use async_trait::async_trait;
use sophie_config::model::OllamaConfig;
use sophie_core::SophieError;
use sophie_core::traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};
use sophie_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, EmbeddingInput, EmbeddingOutput,
    HealthStatus,
};
use tracing::debug;

use crate::client::OllamaClient;

/// Whether `model` is among the installed `models`, allowing for the implicit `:latest` tag.
pub fn model_available(models: &[String], model: &str) -> bool {
    models
        .iter()
        .any(|name| name == model || name.strip_suffix(":latest") == Some(model))
}

async fn model_health(client: &OllamaClient, model: &str) -> HealthStatus {
    match client.list_models().await {
        Ok(models) if model_available(&models, model) => HealthStatus::Healthy,
        Ok(_) => HealthStatus::Degraded(format!(
            "model `{model}` is not installed (try `ollama pull {model}`)"
        )),
        Err(e) => HealthStatus::Unhealthy(e.to_string()),
    }
}

/// Chat completions through Ollama.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: OllamaClient,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Result<Self, SophieError> {
        Ok(Self {
            client: OllamaClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))?,
            model: config.model.clone(),
        })
    }

    pub fn from_client(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SophieError> {
        Ok(model_health(&self.client, &self.model).await)
    }

    async fn shutdown(&self) -> Result<(), SophieError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OllamaProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SophieError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        debug!(model, messages = request.messages.len(), "sending chat request");

        let response = self.client.chat(model, &request.messages).await?;
        Ok(CompletionResponse {
            content: response.message.content,
            model: if response.model.is_empty() {
                model.to_string()
            } else {
                response.model
            },
        })
    }
}

/// Embeddings through Ollama's `/api/embed`.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &OllamaConfig) -> Result<Self, SophieError> {
        Ok(Self {
            client: OllamaClient::new(&config.base_url, Duration::from_secs(config.timeout_secs))?,
            model: config.embedding_model.clone(),
        })
    }

    pub fn from_client(client: OllamaClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PluginAdapter for OllamaEmbedder {
    fn name(&self) -> &str {
        "ollama-embed"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, SophieError> {
        Ok(model_health(&self.client, &self.model).await)
    }

    async fn shutdown(&self) -> Result<(), SophieError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaEmbedder {
    /// Depends on the model; the store learns it from the first vector.
    fn dimensions(&self) -> Option<usize> {
        None
    }

    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, SophieError> {
        let embeddings = self
            .client
            .embed(&self.model, &input.texts)
            .await
            .map_err(|e| match e {
                SophieError::Embedding { .. } => e,
                other => SophieError::Embedding {
                    message: format!("Ollama embedding failed: {other}"),
                    source: Some(Box::new(other)),
                },
            })?;
        let dimensions = embeddings.first().map_or(0, Vec::len);
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}
