//! Error types for nexy-tasks
//!
//! This module provides the single error type used across the crate:
//! - Transport failures (`Network`, `Status`) which the retry client retries
//! - Schema failures (`IncompleteData`) which abort an account pass
//! - Workflow failures (`InvalidStatus`, `UnsupportedProxy`) which are mapped
//!   onto typed outcomes or logged instead of being propagated

use thiserror::Error;

/// Result type alias for nexy-tasks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for nexy-tasks
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "retry.max_attempts")
        key: Option<String>,
    },

    /// Transport-level failure (connect, timeout, TLS, proxy handshake)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("request failed with status code {status}: {}", summarize_body(.body))]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept so callers can inspect server messages
        body: String,
    },

    /// A response was missing a field the workflow depends on
    #[error("incomplete data: {0}")]
    IncompleteData(String),

    /// Verification returned a status string outside the known set
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Proxy URI with a scheme other than http, https, socks4 or socks5
    #[error("unsupported proxy: {0}")]
    UnsupportedProxy(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The `message` field of a JSON error body returned by the server
    ///
    /// The upstream API reports failures as `{"message": "..."}`; some
    /// deployments nest it under `error`. Falls back to the raw body.
    pub fn server_message(&self) -> Option<String> {
        let Error::Status { body, .. } = self else {
            return None;
        };

        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("message")
                .or_else(|| value.get("error").and_then(|e| e.get("message")))
                .map(|m| match m {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .or_else(|| Some(body.clone())),
            Err(_) => Some(body.clone()),
        }
    }

    /// Machine-readable error code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::Status { .. } => "http_status",
            Error::IncompleteData(_) => "incomplete_data",
            Error::InvalidStatus(_) => "invalid_status",
            Error::UnsupportedProxy(_) => "unsupported_proxy",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::Other(_) => "internal_error",
        }
    }
}

fn summarize_body(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}...", cut)
    } else {
        trimmed.to_string()
    }
}
