//! Compiled-in provider and model catalog
//!
//! The catalog is static data: it is never mutated at runtime and lookups are
//! pure. Declaration order doubles as the fallback priority order used by the
//! dispatcher.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Identifier for a supported AI provider
///
/// A closed set: adding a provider means adding a variant here, a catalog
/// entry below, and a `ChatProvider` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    Groq,
    #[serde(rename = "huggingface")]
    HuggingFace,
    Ollama,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderId {
    /// Stable string form used in storage keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Groq => "groq",
            ProviderId::HuggingFace => "huggingface",
            ProviderId::Ollama => "ollama",
            ProviderId::OpenRouter => "openrouter",
        }
    }

    /// Parse from the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(ProviderId::Gemini),
            "groq" => Some(ProviderId::Groq),
            "huggingface" => Some(ProviderId::HuggingFace),
            "ollama" => Some(ProviderId::Ollama),
            "openrouter" => Some(ProviderId::OpenRouter),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable model offered by a provider
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model identifier as used by the provider's API
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description for the settings UI
    pub description: &'static str,
    /// What the model is good at
    pub strengths: &'static [&'static str],
    /// Maximum context length in tokens, if published
    pub context_length: Option<u32>,
    /// Whether this is the provider's default selection
    pub is_default: bool,
}

/// Static configuration for one provider
#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Keys for this provider start with this prefix; checked before any
    /// network validation
    pub key_prefix: &'static str,
    /// Prompt used by the key validator; the response must contain
    /// "test successful"
    pub test_prompt: &'static str,
    pub requires_key: bool,
    /// Runs on the user's machine rather than a hosted endpoint
    pub is_local: bool,
    /// Where the user obtains a key or installs the runtime
    pub setup_url: Option<&'static str>,
    pub models: &'static [ModelInfo],
}

const TEST_PROMPT: &str = "Respond with exactly 'test successful' if you can process this.";

static CATALOG: Lazy<Vec<ProviderInfo>> = Lazy::new(|| {
    vec![
        ProviderInfo {
            id: ProviderId::Gemini,
            display_name: "Google Gemini",
            description: "Google's most capable AI model with strong reasoning and multimodal capabilities",
            key_prefix: "AIza",
            test_prompt: TEST_PROMPT,
            requires_key: true,
            is_local: false,
            setup_url: Some("https://aistudio.google.com"),
            models: &[
                ModelInfo {
                    id: "gemini-2.0-flash-exp",
                    name: "Gemini 2.0 Flash (Experimental)",
                    description: "Latest experimental model with enhanced speed and capabilities",
                    strengths: &["Fast responses", "Latest features", "Multimodal"],
                    context_length: Some(1_000_000),
                    is_default: true,
                },
                ModelInfo {
                    id: "gemini-1.5-pro-latest",
                    name: "Gemini 1.5 Pro",
                    description: "Most capable production model for complex reasoning",
                    strengths: &["Complex reasoning", "Long context", "Code generation"],
                    context_length: Some(2_000_000),
                    is_default: false,
                },
                ModelInfo {
                    id: "gemini-1.5-flash",
                    name: "Gemini 1.5 Flash",
                    description: "Fast and efficient model for most tasks",
                    strengths: &["Speed", "Efficiency", "General purpose"],
                    context_length: Some(1_000_000),
                    is_default: false,
                },
            ],
        },
        ProviderInfo {
            id: ProviderId::Groq,
            display_name: "Groq",
            description: "Ultra-fast AI inference with open-source models",
            key_prefix: "gsk_",
            test_prompt: TEST_PROMPT,
            requires_key: true,
            is_local: false,
            setup_url: Some("https://console.groq.com"),
            models: &[
                ModelInfo {
                    id: "llama-3.3-70b-versatile",
                    name: "Llama 3.3 70B",
                    description: "Most capable Llama model with excellent reasoning",
                    strengths: &["Complex reasoning", "Instruction following", "Math and code"],
                    context_length: Some(32_768),
                    is_default: true,
                },
                ModelInfo {
                    id: "llama-3.1-8b-instant",
                    name: "Llama 3.1 8B Instant",
                    description: "Fast and efficient model for quick responses",
                    strengths: &["Speed", "Efficiency", "Chat"],
                    context_length: Some(131_072),
                    is_default: false,
                },
                ModelInfo {
                    id: "gemma2-9b-it",
                    name: "Gemma 2 9B",
                    description: "Google's open model optimized for instruction following",
                    strengths: &["Instruction following", "Safety", "Efficient"],
                    context_length: Some(8_192),
                    is_default: false,
                },
                ModelInfo {
                    id: "phi-3-medium-4k-instruct",
                    name: "Phi-3 Medium",
                    description: "Microsoft's compact model with strong performance",
                    strengths: &["Efficiency", "Reasoning", "Code"],
                    context_length: Some(4_096),
                    is_default: false,
                },
            ],
        },
        ProviderInfo {
            id: ProviderId::HuggingFace,
            display_name: "Hugging Face",
            description: "Access to various open-source models via Hugging Face Inference API",
            key_prefix: "hf_",
            test_prompt: TEST_PROMPT,
            requires_key: true,
            is_local: false,
            setup_url: Some("https://huggingface.co/settings/tokens"),
            models: &[
                ModelInfo {
                    id: "meta-llama/Llama-3.2-3B-Instruct",
                    name: "Llama 3.2 3B Instruct",
                    description: "Compact instruction-tuned model for efficient inference",
                    strengths: &["Efficiency", "Instruction following", "Low resource"],
                    context_length: Some(131_072),
                    is_default: true,
                },
                ModelInfo {
                    id: "microsoft/Phi-3.5-mini-instruct",
                    name: "Phi-3.5 Mini",
                    description: "Microsoft's small but capable instruction model",
                    strengths: &["Compact", "Fast", "Reasoning"],
                    context_length: Some(131_072),
                    is_default: false,
                },
                ModelInfo {
                    id: "google/gemma-2-2b-it",
                    name: "Gemma 2 2B",
                    description: "Google's lightweight instruction-tuned model",
                    strengths: &["Very fast", "Low resource", "Safety"],
                    context_length: Some(8_192),
                    is_default: false,
                },
            ],
        },
        ProviderInfo {
            id: ProviderId::Ollama,
            display_name: "Ollama (Local)",
            description: "Run AI models locally on your machine - no API key needed",
            key_prefix: "",
            test_prompt: TEST_PROMPT,
            requires_key: false,
            is_local: true,
            setup_url: Some("https://ollama.ai"),
            models: &[
                ModelInfo {
                    id: "llama3.2",
                    name: "Llama 3.2",
                    description: "Meta's latest model running locally",
                    strengths: &["Privacy", "No API costs", "Offline capable"],
                    context_length: None,
                    is_default: true,
                },
                ModelInfo {
                    id: "phi3.5",
                    name: "Phi 3.5",
                    description: "Microsoft's efficient model for local use",
                    strengths: &["Small size", "Fast", "Good reasoning"],
                    context_length: None,
                    is_default: false,
                },
                ModelInfo {
                    id: "gemma2",
                    name: "Gemma 2",
                    description: "Google's open model for local deployment",
                    strengths: &["Safety", "Instruction following", "Efficient"],
                    context_length: None,
                    is_default: false,
                },
                ModelInfo {
                    id: "codellama",
                    name: "CodeLlama",
                    description: "Specialized for code generation and programming",
                    strengths: &["Code generation", "Programming help", "Technical tasks"],
                    context_length: None,
                    is_default: false,
                },
            ],
        },
        ProviderInfo {
            id: ProviderId::OpenRouter,
            display_name: "OpenRouter",
            description: "Access to multiple AI models through a single API",
            key_prefix: "sk-or-",
            test_prompt: TEST_PROMPT,
            requires_key: true,
            is_local: false,
            setup_url: Some("https://openrouter.ai"),
            models: &[
                ModelInfo {
                    id: "google/gemini-flash-1.5",
                    name: "Gemini Flash 1.5",
                    description: "Google's fast model via OpenRouter",
                    strengths: &["Speed", "Cost-effective", "Reliable"],
                    context_length: None,
                    is_default: true,
                },
                ModelInfo {
                    id: "anthropic/claude-3-haiku",
                    name: "Claude 3 Haiku",
                    description: "Anthropic's fast and efficient model",
                    strengths: &["Speed", "Efficiency", "Helpful"],
                    context_length: None,
                    is_default: false,
                },
                ModelInfo {
                    id: "meta-llama/llama-3.1-8b-instruct:free",
                    name: "Llama 3.1 8B (Free)",
                    description: "Free tier access to Llama 3.1",
                    strengths: &["Free", "Open source", "Good performance"],
                    context_length: None,
                    is_default: false,
                },
            ],
        },
    ]
});

/// All providers, in declaration (= fallback priority) order
pub fn all() -> &'static [ProviderInfo] {
    &CATALOG
}

/// Look up a provider's static configuration
pub fn provider(id: ProviderId) -> &'static ProviderInfo {
    CATALOG
        .iter()
        .find(|p| p.id == id)
        .expect("every ProviderId variant has a catalog entry")
}

/// Models offered by a provider
pub fn models(id: ProviderId) -> &'static [ModelInfo] {
    provider(id).models
}

/// The provider's default model
///
/// The entry flagged `is_default`, or the first in declaration order if none
/// is flagged.
pub fn default_model(id: ProviderId) -> &'static ModelInfo {
    let models = models(id);
    models
        .iter()
        .find(|m| m.is_default)
        .unwrap_or_else(|| &models[0])
}
