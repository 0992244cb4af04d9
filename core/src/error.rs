//! Error types for the fetch pipeline.
//!
//! # Design
//! The screen only reacts to "loaded" vs "failed", but the three ways a fetch
//! can fail stay separate variants here so tests and a future retry policy can
//! tell them apart. `HttpError` keeps the raw status and body for debugging.

use thiserror::Error;

/// Errors returned by `FeedClient` parse methods and by a `Transport`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (unreachable host, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not the expected JSON array.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Errors raised while loading a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("page_size must be at least 1")]
    ZeroPageSize,
}
