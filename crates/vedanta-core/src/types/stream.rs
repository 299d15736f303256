//! Streaming response alias

use std::pin::Pin;

use futures::Stream;

use crate::providers::ProviderResult;

/// Incremental text fragments from a provider call
///
/// Single-pass and forward-only. Fragments arrive in provider emission order;
/// an `Err` item terminates the useful portion of the stream.
pub type TextStream = Pin<Box<dyn Stream<Item = ProviderResult<String>> + Send>>;
