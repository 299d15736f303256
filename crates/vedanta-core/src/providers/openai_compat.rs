//! OpenAI-compatible chat provider
//!
//! Groq and OpenRouter both speak the OpenAI chat-completions dialect; one
//! implementation serves both, parameterized by identity and base URL.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::logging::Logger;
use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, TextStream};

use super::error::{ProviderError, ProviderResult};
use super::lines::sse_data_lines;
use super::traits::ChatProvider;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";

pub struct OpenAiCompatProvider {
    id: ProviderId,
    client: reqwest::Client,
    api_base: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Option<Delta>,
}

#[derive(Deserialize)]
struct Delta {
    content: Option<String>,
}

impl OpenAiCompatProvider {
    /// Groq over its OpenAI-compatible endpoint
    pub fn groq(logger: Arc<dyn Logger>) -> Self {
        Self::new(ProviderId::Groq, GROQ_API_BASE, logger)
    }

    /// OpenRouter's unified API
    pub fn openrouter(logger: Arc<dyn Logger>) -> Self {
        Self::new(ProviderId::OpenRouter, OPENROUTER_API_BASE, logger)
    }

    pub fn new(id: ProviderId, api_base: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            id,
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            logger,
        }
    }

    async fn post_completions(
        &self,
        messages: &[ChatMessage],
        model: &str,
        api_key: &str,
        stream: bool,
    ) -> ProviderResult<reqwest::Response> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = CompletionRequest {
            model,
            messages,
            max_tokens: 2048,
            temperature: 0.7,
            stream,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key.trim()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(
                self.id.as_str(),
                status.as_u16(),
                message,
            ));
        }
        Ok(response)
    }

    fn delta_text(payload: &str) -> ProviderResult<Option<String>> {
        let chunk: StreamChunk = serde_json::from_str(payload)?;
        let text = chunk
            .choices
            .first()
            .and_then(|c| c.delta.as_ref())
            .and_then(|d| d.content.clone())
            .unwrap_or_default();
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream> {
        let api_key =
            api_key.ok_or_else(|| ProviderError::missing_api_key(self.id.as_str()))?;

        self.logger
            .debug(&format!("{}: opening stream for model {}", self.id, model));

        let response = self
            .post_completions(&messages, model, api_key, true)
            .await?;

        let stream = sse_data_lines(response).filter_map(move |item| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Some(Err(ProviderError::Cancelled));
                }
                match item {
                    Ok(payload) => Self::delta_text(&payload).transpose(),
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
        api_key: Option<&str>,
    ) -> ProviderResult<String> {
        let api_key =
            api_key.ok_or_else(|| ProviderError::missing_api_key(self.id.as_str()))?;

        let response = self
            .post_completions(&messages, model, api_key, false)
            .await?;
        let parsed: CompletionResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::invalid_response(self.id.as_str(), "no choices"))
    }
}
