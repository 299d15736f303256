//! Key-value storage trait

use thiserror::Error;

/// Errors from storage backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable per-profile string storage
///
/// The contract mirrors origin-scoped browser storage: flat string keys,
/// plain string values, write-through on every set. Implementations:
///
/// - `MemoryKeyValueStore` for tests and ephemeral use
/// - `FileKeyValueStore` for durable on-disk profiles
///
/// Values are stored unencrypted. Keys never leave the user's machine except
/// directly to the owning provider's endpoint; that is the BYOK tradeoff.
pub trait KeyValueStore: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Read a value; `None` if absent
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Whether a value exists for the key
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
