// src/insight/gemini.rs
// =============================================================================
// Client for the generative-language `generateContent` endpoint.
//
// Request:  prompt + system instruction + JSON response schema
// Response: { candidates: [ { content: { parts: [ { text } ] } } ] }
//           where `text` is itself a JSON document matching the schema.
//
// The API key is checked before anything touches the network, so a missing
// key is a configuration error, never a network error.
// =============================================================================

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::digest::{build_user_query, SYSTEM_PROMPT};
use crate::config::{Config, API_KEY_PLACEHOLDER};
use crate::error::{ExplorerError, Result};
use crate::github::ProfileBundle;

/// Structured developer insight returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub main_expertise: String,
    #[serde(rename = "keyTechnologies")]
    pub technologies: Technologies,
    #[serde(rename = "potentialStrengths")]
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technologies {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(rename = "frameworksAndLibraries", default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
}

// Request body ---------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

// Response envelope ----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

fn response_schema() -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "mainExpertise": {
                "type": "STRING",
                "description": "A sentence describing the developer's main area of expertise."
            },
            "keyTechnologies": {
                "type": "OBJECT",
                "properties": {
                    "languages": string_list,
                    "frameworksAndLibraries": string_list,
                    "concepts": string_list
                }
            },
            "potentialStrengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 3-5 potential strengths."
            }
        },
        "required": ["mainExpertise", "keyTechnologies", "potentialStrengths"]
    })
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    url_template: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(http: Client, url_template: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url_template: url_template.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.http_client()?,
            config.gemini_api_url.clone(),
            config.gemini_api_key.clone(),
        ))
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // Asks the model for an insight about one profile
    //
    // Parameters:
    //   bundle: the loaded profile; only its digest (top repositories and
    //           languages) goes into the prompt
    //
    // Returns: the parsed Insight, a Configuration error when no key is set,
    // or "API request failed with status N" for a non-success answer
    pub async fn generate_insight(&self, bundle: &ProfileBundle) -> Result<Insight> {
        let api_key = self.api_key.as_deref().ok_or_else(ExplorerError::missing_api_key)?;
        let url = self.url_template.replace(API_KEY_PLACEHOLDER, api_key);

        let prompt = build_user_query(bundle);
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: &prompt }] }],
            system_instruction: Content { parts: vec![Part { text: SYSTEM_PROMPT }] },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        debug!(login = %bundle.profile.login, "requesting developer insight");
        let response = self.http.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "insight request failed");
            return Err(ExplorerError::Upstream {
                status: status.as_u16(),
                message: format!("API request failed with status {}", status.as_u16()),
            });
        }

        let raw = response.text().await?;
        parse_insight(&raw)
    }
}

/// Unwraps the response envelope and parses the JSON answer inside it.
fn parse_insight(raw: &str) -> Result<Insight> {
    let envelope: GenerateResponse = serde_json::from_str(raw)
        .map_err(|e| ExplorerError::Parse(format!("Unexpected API response: {}", e)))?;

    let text = envelope
        .first_text()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ExplorerError::Parse("Could not extract JSON from API response.".to_string()))?;

    serde_json::from_str(text)
        .map_err(|e| ExplorerError::Parse(format!("Could not parse AI insight: {}", e)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn envelope(text: &str) -> Value {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        })
    }

    pub const INSIGHT_JSON: &str = r#"{
        "mainExpertise": "Backend services in Rust.",
        "keyTechnologies": {
            "languages": ["Rust", "Go"],
            "frameworksAndLibraries": ["tokio", "axum"],
            "concepts": ["async I/O"]
        },
        "potentialStrengths": ["Systems thinking", "Performance work", "Testing"]
    }"#;

    #[test]
    fn test_parse_insight_from_envelope() {
        let insight = parse_insight(&envelope(INSIGHT_JSON).to_string()).unwrap();
        assert_eq!(insight.main_expertise, "Backend services in Rust.");
        assert_eq!(insight.technologies.languages, vec!["Rust", "Go"]);
        assert_eq!(insight.technologies.frameworks, vec!["tokio", "axum"]);
        assert_eq!(insight.strengths.len(), 3);
    }

    #[test]
    fn test_empty_candidates() {
        let err = parse_insight(r#"{"candidates": []}"#).unwrap_err();
        assert_eq!(err.to_string(), "Could not extract JSON from API response.");

        let err = parse_insight(r#"{}"#).unwrap_err();
        assert!(matches!(err, ExplorerError::Parse(_)));
    }

    #[test]
    fn test_schema_violation_is_parse_error() {
        let err = parse_insight(&envelope(r#"{"mainExpertise": 3}"#).to_string()).unwrap_err();
        assert!(matches!(err, ExplorerError::Parse(_)));

        let err = parse_insight(&envelope("not json at all").to_string()).unwrap_err();
        assert!(matches!(err, ExplorerError::Parse(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: "hi" }] }],
            system_instruction: Content { parts: vec![Part { text: SYSTEM_PROMPT }] },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], SYSTEM_PROMPT);
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            value["generationConfig"]["responseSchema"]["required"],
            json!(["mainExpertise", "keyTechnologies", "potentialStrengths"])
        );
    }
}
