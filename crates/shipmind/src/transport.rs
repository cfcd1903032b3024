//! HTTP transport for the generateContent endpoint.

use crate::ShipMindError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Sends one prompt and returns the raw response body.
pub trait Transport: Send + Sync {
    fn generate(&self, api_key: &str, body: &Value) -> Result<String, ShipMindError>;
}

/// Blocking client for the Gemini REST API.
pub struct GeminiTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl GeminiTransport {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self, ShipMindError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("orbital-scale/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url: generate_url(endpoint, model),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for GeminiTransport {
    fn generate(&self, api_key: &str, body: &Value) -> Result<String, ShipMindError> {
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ShipMindError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

/// Stands in when the HTTP client could not be built. Every request fails.
pub struct UnavailableTransport {
    reason: String,
}

impl UnavailableTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl Transport for UnavailableTransport {
    fn generate(&self, _api_key: &str, _body: &Value) -> Result<String, ShipMindError> {
        Err(ShipMindError::Unavailable(self.reason.clone()))
    }
}

/// `{endpoint}/models/{model}:generateContent`, tolerating a trailing slash on the endpoint.
pub fn generate_url(endpoint: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", endpoint.trim_end_matches('/'), model)
}

/// Request body asking for a JSON object `{ description: string, facts: string[] }`.
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "description": { "type": "STRING" },
                    "facts": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            }
        }
    })
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Text of the first candidate (all its text parts, concatenated).
pub fn extract_text(body: &str) -> Result<String, ShipMindError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ShipMindError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_endpoint_and_model() {
        assert_eq!(
            generate_url("https://example.test/v1beta/", "gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_declares_schema() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["properties"]["facts"]["items"]["type"], "STRING");
    }

    #[test]
    fn extract_text_concatenates_first_candidate() {
        let body = r#"{"candidates":[
            {"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        assert_eq!(extract_text(body).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extract_text_empty_candidates() {
        assert!(matches!(extract_text(r#"{"candidates":[]}"#), Err(ShipMindError::EmptyResponse)));
        assert!(matches!(extract_text("{}"), Err(ShipMindError::EmptyResponse)));
        assert!(matches!(
            extract_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(ShipMindError::EmptyResponse)
        ));
    }

    #[test]
    fn unavailable_transport_always_fails() {
        let transport = UnavailableTransport::new("no tls backend");
        let err = transport.generate("key", &request_body("hello")).unwrap_err();
        assert!(matches!(err, ShipMindError::Unavailable(ref reason) if reason == "no tls backend"));
    }

    #[test]
    fn extract_text_rejects_non_json() {
        assert!(matches!(extract_text("<html>"), Err(ShipMindError::Json(_))));
    }
}
