use http::StatusCode;
use relay_core::HttpError;
use serde_json::Value;
use thiserror::Error;

/// Message returned when the upstream answers with a non-success status
pub const UPSTREAM_ERROR_MESSAGE: &str = "Error from Claude API";

/// Message returned when no upstream response could be obtained
pub const TRANSPORT_ERROR_MESSAGE: &str = "Internal server error";

/// Errors that can occur while relaying a chat request
#[derive(Debug, Error)]
pub enum ChatError {
    /// Caller payload failed structural validation
    #[error("{0}")]
    InvalidRequest(String),

    /// Body could not be read as JSON (syntax, content type, size)
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    /// Upstream returned a non-success status
    #[error("upstream returned {status}")]
    Upstream { status: StatusCode, details: Value },

    /// No response was obtained from the upstream
    #[error("upstream transport failed: {0}")]
    Transport(String),
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MalformedBody { status, .. } | Self::Upstream { status, .. } => *status,
            Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidRequest(message) | Self::MalformedBody { message, .. } => message.clone(),
            Self::Upstream { .. } => UPSTREAM_ERROR_MESSAGE.to_owned(),
            Self::Transport(_) => TRANSPORT_ERROR_MESSAGE.to_owned(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::InvalidRequest(_) | Self::MalformedBody { .. } => None,
            Self::Upstream { details, .. } => Some(details.clone()),
            Self::Transport(reason) => Some(Value::String(reason.clone())),
        }
    }
}
