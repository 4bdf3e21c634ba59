//! Generative Language REST client.
//!
//! `POST {base_url}/v1beta/models/{model}:generateContent`, key in the
//! `x-goog-api-key` header. The key is passed in by the caller and never
//! logged.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use sd_schemas::ConceptResult;

use crate::prompt::{concept_prompt, concept_schema, email_prompt};
use crate::{AssistantError, CreativeAssistant, EmailRequest};

/// Endpoint, model and language. Callers build this from their config; there
/// is no built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    /// Language email drafts are written in.
    pub language: String,
}

#[derive(Clone)]
pub struct GeminiAssistant {
    api_key: String,
    settings: GeminiSettings,
    http: reqwest::Client,
}

impl std::fmt::Debug for GeminiAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAssistant")
            .field("api_key", &"<REDACTED>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GeminiAssistant {
    pub fn new(api_key: String, settings: GeminiSettings) -> Self {
        Self {
            api_key,
            settings,
            http: reqwest::Client::new(),
        }
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Send one request and return the concatenated text of the first
    /// candidate (possibly empty).
    async fn generate(&self, body: serde_json::Value) -> Result<String, AssistantError> {
        let resp = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| raw.chars().take(200).collect());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| AssistantError::Decode(e.to_string()))?;
        let text = parsed.text();
        debug!(model = %self.settings.model, chars = text.len(), "gemini/generate ok");
        Ok(text)
    }
}

#[async_trait::async_trait]
impl CreativeAssistant for GeminiAssistant {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_concept(
        &self,
        prompt: &str,
    ) -> Result<Option<ConceptResult>, AssistantError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": concept_prompt(prompt) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": concept_schema(),
            },
        });

        let text = self.generate(body).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        parse_concept(&text).map(Some)
    }

    async fn generate_email(&self, req: &EmailRequest) -> Result<String, AssistantError> {
        let prompt = email_prompt(
            &req.client_name,
            &req.scenario,
            req.tone(),
            &self.settings.language,
        );
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });
        self.generate(body).await
    }
}

/// Decode and sanity-check the model's JSON. List lengths are not enforced;
/// an empty title or empty list is rejected.
pub fn parse_concept(text: &str) -> Result<ConceptResult, AssistantError> {
    let concept: ConceptResult =
        serde_json::from_str(text.trim()).map_err(|e| AssistantError::Decode(e.to_string()))?;

    if concept.title.trim().is_empty() {
        return Err(AssistantError::Decode("concept has an empty title".to_string()));
    }
    if concept.outfit_suggestions.is_empty() || concept.pose_ideas.is_empty() {
        return Err(AssistantError::Decode(
            "concept has no outfit suggestions or pose ideas".to_string(),
        ));
    }
    Ok(concept)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
