//! Core types shared across the crate

mod message;
mod stream;
mod cancellation;

pub use message::{ChatMessage, MessageRole};
pub use stream::TextStream;
pub use cancellation::CancellationToken;
