//! Habitat description payload and its static fallbacks.

use crate::ShipMindError;
use serde::{Deserialize, Serialize};

/// Number of facts a well-formed answer carries.
pub const FACT_COUNT: usize = 3;

/// What the Ship Mind says about the Orbital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitatInfo {
    pub description: String,
    pub facts: Vec<String>,
}

impl HabitatInfo {
    /// Shown when no API credential is available. No request is made.
    pub fn missing_credential() -> Self {
        Self {
            description: "API Key missing. Please provide a valid API Key to retrieve data from the Ship Mind."
                .to_string(),
            facts: vec![
                "Vavatch is a Culture Orbital.".to_string(),
                "It appears in the book Consider Phlebas.".to_string(),
                "Orbitals are held together by force fields.".to_string(),
            ],
        }
    }

    /// Shown when the request or its response fails in any way.
    pub fn offline() -> Self {
        Self {
            description: "Communication with the Ship Mind interrupted. Accessing local cache: Vavatch is a \
                          fourteen-million-kilometer circumference Orbital, significantly larger than any \
                          terrestrial planet."
                .to_string(),
            facts: vec![
                "Constructed from super-tensile material.".to_string(),
                "Simulates gravity via rotation.".to_string(),
                "Destroyed by the Culture to prevent Idiran capture.".to_string(),
            ],
        }
    }

    /// Parse the model's JSON answer. Requires a non-empty description and exactly three facts.
    pub fn from_model_text(text: &str) -> Result<Self, ShipMindError> {
        let info: HabitatInfo = serde_json::from_str(text.trim())?;
        if info.description.trim().is_empty() {
            return Err(ShipMindError::Malformed("empty description".into()));
        }
        if info.facts.len() != FACT_COUNT {
            return Err(ShipMindError::Malformed(format!(
                "expected {} facts, got {}",
                FACT_COUNT,
                info.facts.len()
            )));
        }
        Ok(info)
    }
}
