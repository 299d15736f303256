//! Provider trait definition

use async_trait::async_trait;

use crate::registry::ProviderId;
use crate::types::{CancellationToken, ChatMessage, TextStream};

use super::error::ProviderResult;

/// The single capability each provider implements
///
/// The dispatcher and validator are provider-agnostic: they see transcripts
/// in, text out. Providers own their wire formats entirely.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which catalog entry this implementation serves
    fn id(&self) -> ProviderId;

    /// Stream a chat completion for the given transcript
    ///
    /// Fragments are yielded in provider emission order. Providers without a
    /// streaming API return a stream of one fragment carrying the full
    /// response.
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
        cancel: CancellationToken,
    ) -> ProviderResult<TextStream>;

    /// One blocking round trip; used by the key validator
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        api_key: Option<&str>,
    ) -> ProviderResult<String>;

    /// Reachability probe for local providers
    ///
    /// Remote providers keep the default: they are validated through
    /// `complete` instead.
    async fn ping(&self) -> bool {
        false
    }
}
