//! Typed facade over the key-value store
//!
//! Storage keys follow the original application's layout: `ai_provider` for
//! the active provider, `<provider>_api_key` and `<provider>_selected_model`
//! per provider.

use std::sync::Arc;

use crate::registry::{self, ProviderId};

use super::traits::{KeyValueStore, StoreResult};

/// Credential and selection store
///
/// Reads go to the backend lazily; writes go through immediately. Cloning is
/// cheap and clones share the backend.
#[derive(Clone)]
pub struct ProfileStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// The provider the user has selected, defaulting to the first catalog
    /// entry when unset or unparsable
    pub fn active_provider(&self) -> ProviderId {
        self.backend
            .get("ai_provider")
            .and_then(|s| ProviderId::parse(&s))
            .unwrap_or(registry::all()[0].id)
    }

    pub fn set_active_provider(&self, id: ProviderId) -> StoreResult<()> {
        self.backend.set("ai_provider", id.as_str())
    }

    /// The stored key for a provider; `None` if unset or empty
    pub fn api_key(&self, id: ProviderId) -> Option<String> {
        self.backend
            .get(&format!("{}_api_key", id))
            .filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&self, id: ProviderId, key: &str) -> StoreResult<()> {
        self.backend.set(&format!("{}_api_key", id), key)
    }

    pub fn clear_api_key(&self, id: ProviderId) -> StoreResult<()> {
        self.backend.remove(&format!("{}_api_key", id))
    }

    /// The model the user selected for a provider, or the provider's default
    pub fn selected_model(&self, id: ProviderId) -> String {
        self.backend
            .get(&format!("{}_selected_model", id))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| registry::default_model(id).id.to_string())
    }

    pub fn set_selected_model(&self, id: ProviderId, model: &str) -> StoreResult<()> {
        self.backend.set(&format!("{}_selected_model", id), model)
    }

    /// Presence check for the active provider's credentials
    ///
    /// True when the active provider needs no key, or a non-empty key is
    /// stored. Says nothing about whether the key actually works; that is the
    /// validator's job.
    pub fn has_valid_key(&self) -> bool {
        self.has_key_for(self.active_provider())
    }

    /// Presence check for a specific provider
    pub fn has_key_for(&self, id: ProviderId) -> bool {
        if !registry::provider(id).requires_key {
            return true;
        }
        self.api_key(id).is_some()
    }
}
