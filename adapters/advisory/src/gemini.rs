//! Blocking HTTP client for the hosted generative language API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AdvisoryError, TextGenerator};

/// Model queried when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Text generator backed by the `generateContent` REST endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Creates a client for the provided key and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        if self.api_key.is_empty() {
            return Err(AdvisoryError::MissingApiKey);
        }

        let body = serde_json::to_string(&request_body(prompt))?;
        let response = self
            .agent
            .post(&self.url())
            .query("key", &self.api_key)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|error| AdvisoryError::Request(error.to_string()))?;
        let payload = response
            .into_string()
            .map_err(|error| AdvisoryError::Request(error.to_string()))?;

        parse_reply(&payload)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: [RequestContent {
            parts: [RequestPart { text: prompt }],
        }],
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenates the text parts of the first candidate. A reply without text
/// yields an empty string.
fn parse_reply(payload: &str) -> Result<String, AdvisoryError> {
    let response: GenerateResponse = serde_json::from_str(payload)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}
