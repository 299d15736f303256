//! Google Gemini provider
//!
//! Uses the `generateContent` / `streamGenerateContent?alt=sse` endpoints of
//! the Generative Language API. System prompts map to `systemInstruction`;
//! assistant turns use Gemini's `model` role.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::logging::Logger;
use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, MessageRole, TextStream};

use super::error::{ProviderError, ProviderResult};
use super::lines::sse_data_lines;
use super::traits::ChatProvider;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    logger: Arc<dyn Logger>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
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

    fn build_request(&self, messages: &[ChatMessage]) -> GenerateRequest {
        let mut system_parts: Vec<Part> = Vec::new();
        let mut contents: Vec<Content> = Vec::new();

        for msg in messages {
            match msg.role {
                MessageRole::System => system_parts.push(Part {
                    text: msg.content.clone(),
                }),
                MessageRole::User => contents.push(Content {
                    role: Some("user"),
                    parts: vec![Part {
                        text: msg.content.clone(),
                    }],
                }),
                MessageRole::Assistant => contents.push(Content {
                    role: Some("model"),
                    parts: vec![Part {
                        text: msg.content.clone(),
                    }],
                }),
            }
        }

        GenerateRequest {
            contents,
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(Content {
                    role: None,
                    parts: system_parts,
                })
            },
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 2048,
            },
        }
    }

    async fn post(
        &self,
        model: &str,
        action: &str,
        query: &str,
        api_key: &str,
        body: &GenerateRequest,
    ) -> ProviderResult<reqwest::Response> {
        let url = format!(
            "{}/models/{}:{}{}",
            self.api_base.trim_end_matches('/'),
            model,
            action,
            query
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::api("gemini", status.as_u16(), message));
        }
        Ok(response)
    }

    fn extract_text(payload: &str) -> ProviderResult<Option<String>> {
        let parsed: GenerateResponse = serde_json::from_str(payload)?;
        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream> {
        let api_key = api_key.ok_or_else(|| ProviderError::missing_api_key("gemini"))?;
        let body = self.build_request(&messages);

        self.logger
            .debug(&format!("gemini: opening stream for model {}", model));

        let response = self
            .post(model, "streamGenerateContent", "?alt=sse", api_key, &body)
            .await?;

        let stream = sse_data_lines(response).filter_map(move |item| {
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return Some(Err(ProviderError::Cancelled));
                }
                match item {
                    Ok(payload) => Self::extract_text(&payload).transpose(),
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
        let api_key = api_key.ok_or_else(|| ProviderError::missing_api_key("gemini"))?;
        let body = self.build_request(&messages);

        let response = self
            .post(model, "generateContent", "", api_key, &body)
            .await?;
        let payload = response.text().await?;

        Self::extract_text(&payload)?
            .ok_or_else(|| ProviderError::invalid_response("gemini", "no candidate text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(Arc::new(NoOpLogger))
    }

    #[test]
    fn test_system_prompt_becomes_system_instruction() {
        let req = provider().build_request(&[
            ChatMessage::system("You are Professor Arya"),
            ChatMessage::user("What is Atman?"),
            ChatMessage::assistant("Namaste."),
        ]);

        let instruction = req.system_instruction.expect("system instruction set");
        assert_eq!(instruction.parts[0].text, "You are Professor Arya");
        assert_eq!(req.contents.len(), 2);
        assert_eq!(req.contents[0].role, Some("user"));
        assert_eq!(req.contents[1].role, Some("model"));
    }

    #[test]
    fn test_extract_text_from_candidate() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let text = GeminiProvider::extract_text(payload).unwrap();
        assert_eq!(text, Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_text_skips_empty_chunks() {
        let payload = r#"{"candidates":[{"content":{"parts":[]}}]}"#;
        assert_eq!(GeminiProvider::extract_text(payload).unwrap(), None);

        let no_candidates = r#"{"candidates":[]}"#;
        assert_eq!(GeminiProvider::extract_text(no_candidates).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(GeminiProvider::extract_text("not json").is_err());
    }

    #[tokio::test]
    async fn test_stream_requires_api_key() {
        let result = provider()
            .stream_chat(
                vec![ChatMessage::user("hi")],
                "gemini-2.0-flash-exp",
                None,
                CancellationToken::new(),
            )
            .await;
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }
}
