//! Chat sessions: a transcript bound to a provider, model, and learning level

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::prompts;
use crate::registry::ProviderId;
use crate::types::{ChatMessage, MessageRole};

/// Student learning level, which selects the persona prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for Level {
    fn default() -> Self {
        Level::Intermediate
    }
}

/// A conversation with Professor Arya.
///
/// Creating a session performs no network activity. The transcript starts
/// with the level-appropriate system prompt and grows strictly by appending
/// user and assistant turns.
#[derive(Clone)]
pub struct ChatSession {
    provider: ProviderId,
    model: String,
    level: Level,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatSession {
    pub fn new(provider: ProviderId, model: impl Into<String>, level: Level) -> Self {
        let system = ChatMessage::system(prompts::system_prompt(level));
        Self {
            provider,
            model: model.into(),
            level,
            transcript: Arc::new(Mutex::new(vec![system])),
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Snapshot of the transcript, system prompt included
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }

    /// History without the system prompt, as a UI would render it
    pub fn visible_history(&self) -> Vec<ChatMessage> {
        self.transcript
            .lock()
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .cloned()
            .collect()
    }

    pub(crate) fn push_user(&self, content: impl Into<String>) {
        self.transcript.lock().push(ChatMessage::user(content));
    }

    pub(crate) fn push_assistant(&self, content: impl Into<String>) {
        self.transcript.lock().push(ChatMessage::assistant(content));
    }
}
