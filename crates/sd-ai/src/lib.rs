//! sd-ai
//!
//! Creative assistant boundary: photoshoot concepts and client email drafts
//! produced by an external generative model.
//!
//! [`CreativeAssistant`] is the seam; [`GeminiAssistant`] is the one real
//! backend. Callers go through [`Assistant`], which owns the failure policy:
//!
//! | Situation            | `concept`                 | `email`                      |
//! |----------------------|---------------------------|------------------------------|
//! | no credential        | `Ok(None)`, no request    | [`EMAIL_NOT_CONFIGURED`]     |
//! | model returned empty | `Ok(None)`                | `""`                         |
//! | call failed          | `Err(AssistantError)`     | [`EMAIL_FAILED`]             |
//!
//! No retries. Failures are logged at `warn`.

use std::fmt;
use std::sync::Arc;

use sd_schemas::ConceptResult;
use serde::{Deserialize, Serialize};
use tracing::warn;

mod gemini;
mod prompt;

pub use gemini::{parse_concept, GeminiAssistant, GeminiSettings};
pub use prompt::{concept_prompt, concept_schema, email_prompt, DEFAULT_TONE};

pub const EMAIL_NOT_CONFIGURED: &str = "Error: API key is not configured.";
pub const EMAIL_FAILED: &str = "Error generating email. Please try again.";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantError {
    /// No API key was resolved.
    NotConfigured,
    /// Network or transport failure.
    Transport(String),
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    /// The response could not be decoded into the expected shape.
    Decode(String),
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::NotConfigured => write!(f, "assistant not configured: missing api key"),
            AssistantError::Transport(msg) => write!(f, "transport error: {msg}"),
            AssistantError::Api { status, message } => {
                write!(f, "assistant api error status={status}: {message}")
            }
            AssistantError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for AssistantError {}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub client_name: String,
    pub scenario: String,
    /// Falls back to [`DEFAULT_TONE`] when absent or blank.
    #[serde(default)]
    pub tone: Option<String>,
}

impl EmailRequest {
    pub fn tone(&self) -> &str {
        match self.tone.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TONE,
        }
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
pub trait CreativeAssistant: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the model returned no text.
    async fn generate_concept(&self, prompt: &str) -> Result<Option<ConceptResult>, AssistantError>;

    async fn generate_email(&self, req: &EmailRequest) -> Result<String, AssistantError>;
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Assistant {
    backend: Option<Arc<dyn CreativeAssistant>>,
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl Assistant {
    pub fn new(backend: Arc<dyn CreativeAssistant>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Assistant with no credential: every call short-circuits.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Gemini-backed when `api_key` is present, unconfigured otherwise.
    pub fn gemini(api_key: Option<String>, settings: GeminiSettings) -> Self {
        match api_key {
            Some(key) => Self::new(Arc::new(GeminiAssistant::new(key, settings))),
            None => Self::unconfigured(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn concept(&self, prompt: &str) -> Result<Option<ConceptResult>, AssistantError> {
        let Some(backend) = &self.backend else {
            warn!("concept requested but api key is missing");
            return Ok(None);
        };

        backend.generate_concept(prompt).await.map_err(|e| {
            warn!(backend = backend.name(), error = %e, "concept generation failed");
            e
        })
    }

    /// Always yields displayable text.
    pub async fn email(&self, req: &EmailRequest) -> String {
        let Some(backend) = &self.backend else {
            return EMAIL_NOT_CONFIGURED.to_string();
        };

        match backend.generate_email(req).await {
            Ok(text) => text,
            Err(e) => {
                warn!(backend = backend.name(), error = %e, "email generation failed");
                EMAIL_FAILED.to_string()
            }
        }
    }
}
