// ── Core error types ──
//
// User-facing errors from campanel-core. Consumers never match on reqwest
// or serde errors; the `From<campanel_api::Error>` impl folds them into the
// three outcomes a panel can show: the device was unreachable, it refused
// the request, or it answered with something we could not read.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device: {message}")]
    Unreachable { message: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from device: {message}")]
    MalformedResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The bare message, without the category prefix, for compact display.
    pub fn message(&self) -> &str {
        match self {
            Self::Unreachable { message }
            | Self::Rejected { message, .. }
            | Self::MalformedResponse { message }
            | Self::Validation { message }
            | Self::Config { message } => message,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<campanel_api::Error> for CoreError {
    fn from(err: campanel_api::Error) -> Self {
        match err {
            campanel_api::Error::Transport(e) => CoreError::Unreachable {
                message: e.to_string(),
            },
            campanel_api::Error::Status { status, message } => {
                CoreError::Rejected { status, message }
            }
            campanel_api::Error::Deserialization { message, .. } => {
                CoreError::MalformedResponse { message }
            }
            campanel_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid device URL: {e}"),
            },
            campanel_api::Error::Tls(message) => CoreError::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_device_message() {
        let err: CoreError = campanel_api::Error::Status {
            status: 500,
            message: "nmcli failed".into(),
        }
        .into();
        assert_eq!(
            err,
            CoreError::Rejected {
                status: 500,
                message: "nmcli failed".into()
            }
        );
        assert_eq!(err.message(), "nmcli failed");
    }

    #[test]
    fn decode_errors_drop_raw_body() {
        let err: CoreError = campanel_api::Error::Deserialization {
            message: "missing field `networks`".into(),
            body: "{\"error\":\"x\"}".into(),
        }
        .into();
        assert!(matches!(err, CoreError::MalformedResponse { .. }));
        assert!(!err.to_string().contains("\"error\""));
    }
}
