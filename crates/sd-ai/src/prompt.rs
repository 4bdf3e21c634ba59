//! Prompt text and the structured-output schema for concept requests.

use serde_json::{json, Value};

/// Tone used when the caller does not pick one.
pub const DEFAULT_TONE: &str = "Professional and friendly";

pub fn concept_prompt(request: &str) -> String {
    format!(
        "You are a professional creative director for photography.\n\
         Generate a photoshoot concept based on this request: \"{}\".\n\
         Return the response in JSON format.",
        request.trim()
    )
}

pub fn email_prompt(client_name: &str, scenario: &str, tone: &str, language: &str) -> String {
    format!(
        "Write an email (in {language}) to a photography client named {client}.\n\
         Scenario: {scenario}.\n\
         Tone: {tone}.\n\
         Keep it professional but warm. Do not include a subject line or a \
         subject prefix. Just the body.",
        client = client_name.trim(),
        scenario = scenario.trim(),
        tone = tone.trim(),
    )
}

/// Response schema sent with concept requests. Field names match
/// `ConceptResult`'s camelCase wire form.
pub fn concept_schema() -> Value {
    let string_list = |description: &str| {
        json!({
            "type": "ARRAY",
            "items": { "type": "STRING" },
            "description": description,
        })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "A catchy title for the concept" },
            "mood": { "type": "STRING", "description": "The emotional atmosphere" },
            "lighting": { "type": "STRING", "description": "Lighting setup recommendations" },
            "outfitSuggestions": string_list("List of 3-4 outfit ideas"),
            "poseIdeas": string_list("List of 3-4 posing prompts"),
        },
        "required": ["title", "mood", "lighting", "outfitSuggestions", "poseIdeas"],
    })
}
