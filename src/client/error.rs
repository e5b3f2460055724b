use reqwest::StatusCode;
use std::collections::HashMap;

/// Failures surfaced by [`crate::client::ApiClient`]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: StatusCode,
        message: Option<String>,
        field_errors: HashMap<String, String>,
    },

    /// No response was received (connection refused, timeout, DNS)
    #[error("could not reach the server: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// A response arrived but its body was not what we expected
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
}

pub const UNREACHABLE_MESSAGE: &str = "Could not connect to the server";

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, ClientError::Unreachable(_))
    }

    /// Message provided by the server in the error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Human readable text for inline errors and notifications: the server's
    /// own message when it sent one, otherwise `context` plus the status.
    pub fn user_message(&self, context: &str) -> String {
        match self {
            ClientError::Status { message: Some(message), .. } => message.clone(),
            ClientError::Status { status, .. } => format!("{}: {}", context, status.as_u16()),
            ClientError::Unreachable(_) => UNREACHABLE_MESSAGE.to_string(),
            ClientError::Decode(_) | ClientError::Url(_) => context.to_string(),
        }
    }
}
