//! Provider implementations
//!
//! Each supported provider implements the single `ChatProvider` capability:
//! transcript in, text fragments out. Groq and OpenRouter share the
//! OpenAI-compatible implementation; Gemini, Hugging Face, and Ollama each
//! speak their own dialect. `MockProvider` scripts behavior for tests.

mod traits;
mod error;
mod lines;
mod gemini;
mod openai_compat;
mod huggingface;
mod ollama;
mod mock;

pub use traits::ChatProvider;
pub use error::{ProviderError, ProviderResult};
pub use gemini::GeminiProvider;
pub use openai_compat::{OpenAiCompatProvider, GROQ_API_BASE, OPENROUTER_API_BASE};
pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
pub use mock::{AttemptLog, MockBehavior, MockProvider};

use std::sync::Arc;

use crate::logging::Logger;
use crate::registry::ProviderId;

/// Create the real implementation for a catalog provider
pub fn create_provider(id: ProviderId, logger: Arc<dyn Logger>) -> Arc<dyn ChatProvider> {
    match id {
        ProviderId::Gemini => Arc::new(GeminiProvider::new(logger)),
        ProviderId::Groq => Arc::new(OpenAiCompatProvider::groq(logger)),
        ProviderId::HuggingFace => Arc::new(HuggingFaceProvider::new(logger)),
        ProviderId::Ollama => Arc::new(OllamaProvider::new(logger)),
        ProviderId::OpenRouter => Arc::new(OpenAiCompatProvider::openrouter(logger)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::registry;

    #[test]
    fn test_factory_covers_catalog() {
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
        for info in registry::all() {
            let provider = create_provider(info.id, Arc::clone(&logger));
            assert_eq!(provider.id(), info.id);
        }
    }
}
