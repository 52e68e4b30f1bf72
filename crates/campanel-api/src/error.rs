use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for the `campanel-api` crate.
///
/// Covers every failure mode of a device request: the transport never
/// reaching the appliance, the appliance answering with a non-2xx status,
/// and a 2xx body that does not decode. `campanel-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client builder error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device ──────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the device's own `{"error": ...}`
    /// text when it sent one, otherwise the HTTP reason phrase.
    #[error("Request failed (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of the failed request, if the device answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the appliance could not be reached.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// The `{ "error": message }` wire shape for this failure.
    pub fn payload(&self) -> ErrorPayload {
        let error = match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        };
        ErrorPayload { error }
    }
}

/// Error object the appliance returns alongside non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}
