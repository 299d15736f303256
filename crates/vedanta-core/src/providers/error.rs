//! Provider error types

use thiserror::Error;

/// Errors from provider calls
///
/// These never cross the UI boundary: the validator collapses them to
/// `false`, the dispatcher to the fallback chain and the fixed apology text.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A key is required but none is stored
    #[error("API key is required for {provider}")]
    MissingApiKey { provider: String },

    /// The provider answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },

    /// Network/transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The turn was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// A well-formed response carried no usable text
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

impl ProviderError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
