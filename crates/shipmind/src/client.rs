//! The Ship Mind: credential, transport and fallback policy.

use crate::{
    info::HabitatInfo,
    transport::{extract_text, request_body, GeminiTransport, Transport, UnavailableTransport},
    ShipMindError,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PROMPT: &str = "Describe the Vavatch Orbital from Iain M. Banks' Consider Phlebas. \
Focus on its immense scale compared to a planet like Earth. Return the response as a JSON object \
with a 'description' string (max 80 words) and an array of 3 fascinating 'facts' strings.";

/// Checked after the configured variable.
pub const FALLBACK_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service settings, nested under `ship_mind` in `config.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipMindConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for ShipMindConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ShipMindConfig {
    /// API key from the configured variable, then `GEMINI_API_KEY`. Blank values count as missing.
    pub fn credential_from_env(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_KEY_ENV]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

pub struct ShipMind {
    credential: Option<String>,
    transport: Box<dyn Transport>,
}

impl ShipMind {
    pub fn new(credential: Option<String>, transport: Box<dyn Transport>) -> Self {
        let credential = credential.filter(|key| !key.trim().is_empty());
        Self { credential, transport }
    }

    /// Real HTTP transport with the credential read from the environment.
    /// If the HTTP client cannot be built the Ship Mind still exists, answering
    /// every query with the offline text.
    pub fn from_config(config: &ShipMindConfig) -> Self {
        let credential = config.credential_from_env();
        if credential.is_none() {
            log::warn!(
                "No Ship Mind credential in ${} or ${}; queries will return the offline notice",
                config.api_key_env,
                FALLBACK_KEY_ENV
            );
        }
        match GeminiTransport::new(
            &config.endpoint,
            &config.model,
            Duration::from_secs(config.timeout_secs.max(1)),
        ) {
            Ok(transport) => {
                log::info!("Ship Mind endpoint: {}", transport.url());
                Self::new(credential, Box::new(transport))
            }
            Err(e) => {
                log::error!("Ship Mind transport unavailable: {}", e);
                Self::unavailable(credential, e.to_string())
            }
        }
    }

    /// A Ship Mind with no working transport.
    pub fn unavailable(credential: Option<String>, reason: impl Into<String>) -> Self {
        Self::new(credential, Box::new(UnavailableTransport::new(reason)))
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Ask for the habitat description. Never fails: a missing credential yields the
    /// credential notice without any request, and every other failure yields the
    /// offline text.
    pub fn fetch_habitat_info(&self) -> HabitatInfo {
        match self.try_fetch() {
            Ok(info) => info,
            Err(ShipMindError::MissingCredential) => {
                log::warn!("Ship Mind query skipped: no credential");
                HabitatInfo::missing_credential()
            }
            Err(e) => {
                log::error!("Ship Mind query failed: {}", e);
                HabitatInfo::offline()
            }
        }
    }

    fn try_fetch(&self) -> Result<HabitatInfo, ShipMindError> {
        let api_key = self.credential.as_deref().ok_or(ShipMindError::MissingCredential)?;
        let body = self.transport.generate(api_key, &request_body(PROMPT))?;
        let text = extract_text(&body)?;
        let info = HabitatInfo::from_model_text(&text)?;
        log::debug!("Ship Mind answered with {} facts", info.facts.len());
        Ok(info)
    }
}
