//! Transport error taxonomy and user-facing messages.

use thiserror::Error;

use crate::api::types::ApiErrorResponse;

pub const MSG_UNREACHABLE: &str = "Unable to reach the server. Please check your connection.";
pub const MSG_CONFLICT: &str = "A conflict occurred.";
pub const MSG_INVALID_REQUEST: &str = "Invalid request. Please check your input.";
pub const MSG_SERVER_ERROR: &str = "A server error occurred. Please try again later.";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred.";

/// Errors from a call to the payment service.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response at all: connection refused, DNS failure, timeout.
    #[error("{endpoint} unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: Option<ApiErrorResponse>,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl TransportError {
    pub fn unreachable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    pub fn status(endpoint: impl Into<String>, status: u16, body: Option<ApiErrorResponse>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body,
        }
    }

    /// HTTP status, or `None` when no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for an error notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable { .. } => MSG_UNREACHABLE.to_string(),
            Self::Status { status: 409, body, .. } => joined_errors(body).unwrap_or_else(|| MSG_CONFLICT.to_string()),
            Self::Status { status: 400..=499, body, .. } => {
                joined_errors(body).unwrap_or_else(|| MSG_INVALID_REQUEST.to_string())
            }
            Self::Status { status: 500.., .. } => MSG_SERVER_ERROR.to_string(),
            Self::Status { .. } | Self::Decode { .. } => MSG_UNEXPECTED.to_string(),
        }
    }
}

fn joined_errors(body: &Option<ApiErrorResponse>) -> Option<String> {
    body.as_ref()
        .filter(|b| !b.errors.is_empty())
        .map(|b| b.errors.join("; "))
}
