//! Credential and selection storage
//!
//! A pluggable key-value layer (`KeyValueStore`) with memory and file-backed
//! implementations, and `ProfileStore`, the typed facade the rest of the
//! crate uses for the active provider, per-provider API keys, and model
//! selections.

mod traits;
mod memory;
mod file;
mod profile;

pub use traits::{KeyValueStore, StoreError, StoreResult};
pub use memory::MemoryKeyValueStore;
pub use file::FileKeyValueStore;
pub use profile::ProfileStore;
