//! "Ship Mind" queries: asks a generative-language API to describe the Orbital.
//!
//! Every failure degrades to a static fallback text; callers never see an error.

pub mod client;
pub mod info;
pub mod tracker;
pub mod transport;

pub use client::*;
pub use info::*;
pub use tracker::*;
pub use transport::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShipMindError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response contained no text")]
    EmptyResponse,
    #[error("malformed habitat info: {0}")]
    Malformed(String),
}
