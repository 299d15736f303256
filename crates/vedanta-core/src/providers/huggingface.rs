//! Hugging Face Inference API provider
//!
//! The serverless Inference API takes a flat text prompt and returns the
//! completion in one response. The transcript is flattened to `role: content`
//! lines, and streaming degrades to a single fragment carrying the full
//! response.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use serde::Serialize;
use serde_json::Value;

use crate::logging::Logger;
use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, TextStream};

use super::error::{ProviderError, ProviderResult};
use super::traits::ChatProvider;

const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co/models";

pub struct HuggingFaceProvider {
    client: reqwest::Client,
    api_base: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
}

impl HuggingFaceProvider {
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

    fn flatten_transcript(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The API returns either `[{"generated_text": ...}]` or
    /// `{"generated_text": ...}` depending on the model pipeline
    fn generated_text(value: &Value) -> Option<String> {
        let text = match value {
            Value::Array(items) => items.first()?.get("generated_text")?.as_str()?,
            other => other.get("generated_text")?.as_str()?,
        };
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

#[async_trait]
impl ChatProvider for HuggingFaceProvider {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream> {
        // No streaming endpoint; degrade to one fragment
        let full = self.complete(messages, model, api_key).await?;
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        Ok(Box::pin(stream::iter(vec![Ok(full)])))
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
    ) -> ProviderResult<String> {
        let api_key = api_key.ok_or_else(|| ProviderError::missing_api_key("huggingface"))?;
        let url = format!("{}/{}", self.api_base.trim_end_matches('/'), model);

        self.logger
            .debug(&format!("huggingface: inference call to model {}", model));

        let body = InferenceRequest {
            inputs: Self::flatten_transcript(&messages),
            parameters: InferenceParameters {
                max_new_tokens: 1024,
                temperature: 0.7,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::api("huggingface", status.as_u16(), message));
        }

        let value: Value = response.json().await?;
        Self::generated_text(&value)
            .ok_or_else(|| ProviderError::invalid_response("huggingface", "no generated_text"))
    }
}
