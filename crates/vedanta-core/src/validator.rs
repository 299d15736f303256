//! API key validation
//!
//! Validation never returns an error: any failure, from a bad prefix to a
//! network timeout, reads as "not valid". Callers surface the boolean in the
//! settings UI and nothing else.

use crate::providers::ChatProvider;
use crate::registry;

/// Outcome of the most recent validation attempt for a stored key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    /// Validation ran and the provider answered the test prompt
    Valid,
    /// Validation ran and failed
    Invalid,
    /// No validation has been attempted yet
    Untested,
}

impl From<bool> for KeyStatus {
    fn from(valid: bool) -> Self {
        if valid {
            KeyStatus::Valid
        } else {
            KeyStatus::Invalid
        }
    }
}

/// Check whether a key works with its provider.
///
/// Local providers ignore the key and answer with a reachability probe.
/// Hosted providers are rejected without network activity when the key does
/// not carry the provider's known prefix; otherwise the test prompt is sent
/// to the default model and the reply must contain "test successful",
/// case-insensitively.
pub async fn test_key(provider: &dyn ChatProvider, key: &str) -> bool {
    let info = registry::provider(provider.id());

    if !info.requires_key {
        return provider.ping().await;
    }

    let key = key.trim();
    if key.is_empty() || !key.starts_with(info.key_prefix) {
        return false;
    }

    let messages = vec![crate::types::ChatMessage::user(info.test_prompt)];
    let model = registry::default_model(provider.id()).id;

    match provider.complete(messages, model, Some(key)).await {
        Ok(text) => text.to_lowercase().contains("test successful"),
        Err(_) => false,
    }
}
