//! Transport/service error taxonomy.

use thiserror::Error;

/// Alert text used when a failure carries no server-supplied message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failure of a single file-manager request.
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("request rejected with status {status}: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the JSON `error` field, when the body carried one.
        message: Option<String>,
    },
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// A 2xx body did not match the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// No transport is available for the current target.
    #[error("{0}")]
    Unsupported(String),
}

impl ApiError {
    /// Builds a rejection carrying a server message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// Message presented to the user: the server's `error` text, or a generic fallback.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
