// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a local Ollama server.
//!
//! Provides [`OllamaClient`], which builds requests, maps transport failures
//! onto [`SophieError`] and retries once on transient statuses.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sophie_core::{ChatMessage, SophieError};
use tracing::{debug, warn};

use crate::types::{
    ApiError, ChatRequest, ChatResponse, EmbedRequest, EmbedResponse, TagsResponse,
};

/// HTTP client for the Ollama REST API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl OllamaClient {
    /// Creates a client for the server at `base_url`, bounding every request by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SophieError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SophieError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries: 1,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a non-streaming chat request and returns the assistant message.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatResponse, SophieError> {
        let body = ChatRequest {
            model,
            messages,
            stream: false,
        };
        self.post("/api/chat", model, &body).await
    }

    /// Embeds `texts` with `model`, one vector per text.
    pub async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>, SophieError> {
        let body = EmbedRequest {
            model,
            input: texts,
        };
        let response: EmbedResponse = self.post("/api/embed", model, &body).await?;
        if response.embeddings.len() != texts.len() {
            return Err(SophieError::Embedding {
                message: format!(
                    "Ollama returned {} embeddings for {} inputs",
                    response.embeddings.len(),
                    texts.len()
                ),
                source: None,
            });
        }
        Ok(response.embeddings)
    }

    /// Names of the models installed on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, SophieError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, "tags response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let tags: TagsResponse = decode(response).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn post<B, T>(&self, endpoint: &str, model: &str, body: &B) -> Result<T, SophieError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{endpoint}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, endpoint, "retrying request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, endpoint, "response received");

            if status.is_success() {
                return decode(response).await;
            }

            let text = response.text().await.unwrap_or_default();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(SophieError::Provider {
                    message: format!("model `{model}` not found on the Ollama server"),
                    source: None,
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(api_error(status, &text));
                continue;
            }

            return Err(api_error(status, &text));
        }

        Err(last_error.unwrap_or_else(|| SophieError::Provider {
            message: "request failed after retries".into(),
            source: None,
        }))
    }

    fn transport_error(&self, e: reqwest::Error) -> SophieError {
        if e.is_timeout() {
            SophieError::Timeout {
                duration: self.timeout,
            }
        } else if e.is_connect() {
            SophieError::Unreachable {
                endpoint: self.base_url.clone(),
                source: Box::new(e),
            }
        } else {
            SophieError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SophieError> {
    let body = response.text().await.map_err(|e| SophieError::Provider {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| SophieError::Provider {
        message: format!("malformed response from Ollama: {e}"),
        source: Some(Box::new(e)),
    })
}

fn api_error(status: reqwest::StatusCode, body: &str) -> SophieError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(api) => format!("Ollama error ({status}): {}", api.error),
        Err(_) => format!("Ollama returned {status}: {body}"),
    };
    SophieError::Provider {
        message,
        source: None,
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
