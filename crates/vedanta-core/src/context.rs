//! Application-facing entry point
//!
//! `ChatContext` wires the profile store, the provider set, and the
//! dispatcher together. A UI holds exactly one of these.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dispatcher::{Dispatcher, TurnStream};
use crate::logging::Logger;
use crate::prompts;
use crate::providers::{create_provider, ChatProvider};
use crate::registry::{self, ProviderId, ProviderInfo};
use crate::session::{ChatSession, Level};
use crate::store::{KeyValueStore, ProfileStore, StoreResult};
use crate::validator;

pub struct ChatContext {
    profile: ProfileStore,
    providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
    dispatcher: Dispatcher,
}

impl ChatContext {
    /// Build a context with the real provider implementations
    pub fn new(backend: Arc<dyn KeyValueStore>, logger: Arc<dyn Logger>) -> Self {
        let providers = registry::all()
            .iter()
            .map(|info| (info.id, create_provider(info.id, Arc::clone(&logger))))
            .collect();
        Self::with_providers(backend, providers, logger)
    }

    /// Build a context over an explicit provider set; used by tests to
    /// substitute scripted providers
    pub fn with_providers(
        backend: Arc<dyn KeyValueStore>,
        providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let profile = ProfileStore::new(backend);
        let dispatcher = Dispatcher::new(providers.clone(), profile.clone(), logger);
        Self {
            profile,
            providers,
            dispatcher,
        }
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    /// Providers available for selection, in catalog order
    pub fn list_providers(&self) -> &'static [ProviderInfo] {
        registry::all()
    }

    /// Whether the active provider can serve a turn right now, judged by key
    /// presence alone
    pub fn has_valid_key(&self) -> bool {
        self.profile.has_valid_key()
    }

    /// Start a session against the active provider and its selected model.
    /// No network activity happens here.
    pub fn create_session(&self, level: Level) -> ChatSession {
        let provider = self.profile.active_provider();
        let model = self.profile.selected_model(provider);
        ChatSession::new(provider, model, level)
    }

    /// The welcome message for a learning level
    pub fn introduction(&self, level: Level) -> String {
        prompts::introduction(level)
    }

    /// Send a free-form question
    pub fn send_turn(&self, session: &ChatSession, text: &str) -> TurnStream {
        self.dispatcher.send_turn(session, text)
    }

    /// Send a question framed within a course topic
    pub fn send_topic_turn(&self, session: &ChatSession, topic_id: &str, text: &str) -> TurnStream {
        let enhanced = prompts::enhance_topic_prompt(topic_id, text);
        self.dispatcher.send_turn(session, &enhanced)
    }

    /// Validate a key against its provider; see [`validator::test_key`]
    pub async fn test_key(&self, id: ProviderId, key: &str) -> bool {
        match self.providers.get(&id) {
            Some(provider) => validator::test_key(provider.as_ref(), key).await,
            None => false,
        }
    }

    /// Store a key after a successful validation flow
    pub fn set_api_key(&self, id: ProviderId, key: &str) -> StoreResult<()> {
        self.profile.set_api_key(id, key)
    }

    /// Per-provider health snapshot without network activity: hosted
    /// providers are healthy when a stored key carries the known prefix,
    /// local providers are always listed as healthy here
    pub fn check_health(&self) -> Vec<(ProviderId, bool)> {
        registry::all()
            .iter()
            .map(|info| {
                let healthy = if info.requires_key {
                    self.profile
                        .api_key(info.id)
                        .is_some_and(|key| key.starts_with(info.key_prefix))
                } else {
                    true
                };
                (info.id, healthy)
            })
            .collect()
    }

    /// Providers usable right now: hosted ones with a stored key, local ones
    /// that answer a reachability probe
    pub async fn available_providers(&self) -> Vec<ProviderId> {
        let mut out = Vec::new();
        for info in registry::all() {
            if info.requires_key {
                if self.profile.has_key_for(info.id) {
                    out.push(info.id);
                }
            } else if let Some(provider) = self.providers.get(&info.id) {
                if provider.ping().await {
                    out.push(info.id);
                }
            }
        }
        out
    }
}
