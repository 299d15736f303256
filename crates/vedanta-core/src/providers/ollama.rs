//! Ollama local provider
//!
//! Talks to a locally running Ollama daemon: `/api/chat` for turns (NDJSON
//! streaming) and `/api/tags` as the reachability probe. No API key is
//! involved.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::logging::Logger;
use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, TextStream};

use super::error::{ProviderError, ProviderResult};
use super::lines::json_lines;
use super::traits::ChatProvider;

const DEFAULT_API_BASE: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: reqwest::Client,
    api_base: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatChunk {
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

impl OllamaProvider {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, logger)
    }

    pub fn with_api_base(api_base: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            logger,
        }
    }

    async fn post_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        stream: bool,
    ) -> ProviderResult<reqwest::Response> {
        let url = format!("{}/api/chat", self.api_base.trim_end_matches('/'));
        let body = ChatRequest {
            model,
            messages,
            stream,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::api("ollama", status.as_u16(), message));
        }
        Ok(response)
    }

    fn chunk_text(payload: &str) -> ProviderResult<Option<String>> {
        let chunk: ChatChunk = serde_json::from_str(payload)?;
        if chunk.done {
            return Ok(None);
        }
        let text = chunk.message.map(|m| m.content).unwrap_or_default();
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        _api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream> {
        self.logger
            .debug(&format!("ollama: opening stream for model {}", model));

        let response = self.post_chat(&messages, model, true).await?;

        let stream = json_lines(response).filter_map(move |item| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Some(Err(ProviderError::Cancelled));
                }
                match item {
                    Ok(payload) => Self::chunk_text(&payload).transpose(),
                    Err(e) => Some(Err(e)),
                }
            }
        });

        Ok(Box::pin(stream))
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        _api_key: Option<&str>,
    ) -> ProviderResult<String> {
        let response = self.post_chat(&messages, model, false).await?;
        let chunk: ChatChunk = response.json().await?;

        chunk
            .message
            .map(|m| m.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::invalid_response("ollama", "no message content"))
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/api/tags", self.api_base.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                self.logger
                    .debug(&format!("ollama: daemon unreachable: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text() {
        let payload = r#"{"message":{"role":"assistant","content":"Om"},"done":false}"#;
        assert_eq!(
            OllamaProvider::chunk_text(payload).unwrap(),
            Some("Om".to_string())
        );
    }

    #[test]
    fn test_done_chunk_carries_no_text() {
        let payload = r#"{"message":{"role":"assistant","content":""},"done":true}"#;
        assert_eq!(OllamaProvider::chunk_text(payload).unwrap(), None);
    }

    #[test]
    fn test_malformed_chunk_is_an_error() {
        assert!(OllamaProvider::chunk_text("{truncated").is_err());
    }

    #[tokio::test]
    async fn test_ping_unreachable_daemon() {
        use crate::logging::NoOpLogger;

        // Port 1 is never an Ollama daemon
        let provider =
            OllamaProvider::with_api_base("http://127.0.0.1:1", Arc::new(NoOpLogger));
        assert!(!provider.ping().await);
    }
}
