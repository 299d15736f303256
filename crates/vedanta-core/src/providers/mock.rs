//! Mock provider for tests
//!
//! Deterministic, configurable responses with no network. Stands in for any
//! catalog provider, so dispatcher tests can script the whole fallback chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use parking_lot::Mutex;

use crate::logging::Logger;
use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, TextStream};

use super::error::{ProviderError, ProviderResult};
use super::traits::ChatProvider;

/// Scripted behavior for a mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Yield the response split into fixed-size fragments
    Respond(String),
    /// Yield these exact fragments
    Fragments(Vec<String>),
    /// Fail when the stream is opened, before any fragment
    FailToStart(String),
    /// Yield this many fragments, then fail mid-stream
    FailAfter { fragments: Vec<String>, message: String },
    /// Yield nothing and finish
    Empty,
}

/// Records the order in which mock providers were attempted
pub type AttemptLog = Arc<Mutex<Vec<ProviderId>>>;

pub struct MockProvider {
    id: ProviderId,
    behavior: MockBehavior,
    fragment_delay: Duration,
    reachable: bool,
    attempts: Option<AttemptLog>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    pub fn new(id: ProviderId, behavior: MockBehavior, logger: Arc<dyn Logger>) -> Self {
        Self {
            id,
            behavior,
            fragment_delay: Duration::ZERO,
            reachable: true,
            attempts: None,
            logger,
        }
    }

    /// Record each `stream_chat` call into the shared log
    pub fn with_attempt_log(mut self, log: AttemptLog) -> Self {
        self.attempts = Some(log);
        self
    }

    /// Pause between fragments (for cancellation tests)
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Control the `ping` answer (for local-provider tests)
    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    fn fragments(&self) -> Result<Vec<String>, String> {
        match &self.behavior {
            MockBehavior::Respond(text) => {
                let chars: Vec<char> = text.chars().collect();
                Ok(chars.chunks(8).map(|c| c.iter().collect()).collect())
            }
            MockBehavior::Fragments(fragments) => Ok(fragments.clone()),
            MockBehavior::FailToStart(message) => Err(message.clone()),
            MockBehavior::FailAfter { fragments, .. } => Ok(fragments.clone()),
            MockBehavior::Empty => Ok(Vec::new()),
        }
    }

    fn record_attempt(&self) {
        if let Some(log) = &self.attempts {
            log.lock().push(self.id);
        }
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn stream_chat(
        &self,
        _messages: Vec<ChatMessage>,
        _model: &str,
        _api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream> {
        self.record_attempt();
        self.logger
            .debug(&format!("mock({}): stream_chat", self.id));

        let fragments = match self.fragments() {
            Ok(f) => f,
            Err(message) => {
                return Err(ProviderError::api(self.id.as_str(), 500, message));
            }
        };

        let trailing_error = match &self.behavior {
            MockBehavior::FailAfter { message, .. } => Some(message.clone()),
            _ => None,
        };

        let delay = self.fragment_delay;
        let id = self.id;

        let items: Vec<ProviderResult<String>> = fragments.into_iter().map(Ok).collect();
        let stream = stream::iter(items.into_iter().enumerate())
            .then(move |(i, item)| {
                let cancel = cancel.clone();
                async move {
                    if i > 0 && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    if cancel.is_cancelled() {
                        return Err(ProviderError::Cancelled);
                    }
                    item
                }
            })
            .chain(stream::iter(trailing_error.into_iter().map(move |message| {
                Err(ProviderError::api(id.as_str(), 500, message))
            })));

        Ok(Box::pin(stream))
    }

    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _model: &str,
        _api_key: Option<&str>,
    ) -> ProviderResult<String> {
        self.record_attempt();
        match &self.behavior {
            MockBehavior::FailToStart(message) | MockBehavior::FailAfter { message, .. } => {
                Err(ProviderError::api(self.id.as_str(), 500, message.clone()))
            }
            _ => Ok(self
                .fragments()
                .unwrap_or_default()
                .concat()),
        }
    }

    async fn ping(&self) -> bool {
        self.reachable
    }
}
