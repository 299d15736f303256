//! Vedanta Vision Core
//!
//! Provider-agnostic chat engine for the Vedanta Vision learning platform.
//! The crate owns everything between the UI and the AI providers:
//!
//! - a compiled-in catalog of supported providers and their models
//! - bring-your-own-key credential storage with memory and file backends
//! - streaming chat with automatic fallback across configured providers
//! - key validation that never raises
//! - the Professor Arya persona prompts
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vedanta_core::{ChatContext, ConsoleLogger, Level, MemoryKeyValueStore};
//!
//! # async fn run() {
//! let ctx = ChatContext::new(
//!     Arc::new(MemoryKeyValueStore::new()),
//!     Arc::new(ConsoleLogger::new()),
//! );
//! let session = ctx.create_session(Level::Beginner);
//! let reply = ctx.send_turn(&session, "What is Vedanta?").collect_text().await;
//! println!("{reply}");
//! # }
//! ```

pub mod types;
pub mod registry;
pub mod store;
pub mod logging;
pub mod providers;
pub mod validator;
pub mod prompts;
pub mod session;
pub mod dispatcher;
pub mod context;

// Re-export the surface a host application needs
pub use types::{CancellationToken, ChatMessage, MessageRole, TextStream};

pub use registry::{ModelInfo, ProviderId, ProviderInfo};

pub use store::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, ProfileStore, StoreError, StoreResult,
};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use providers::{ChatProvider, ProviderError, ProviderResult};

pub use validator::{test_key, KeyStatus};

pub use session::{ChatSession, Level};

pub use dispatcher::TurnStream;

pub use context::ChatContext;
