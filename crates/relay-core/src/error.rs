use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The handler layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Diagnostic payload attached as `details`, if any
    fn details(&self) -> Option<Value> {
        None
    }

    /// Render the error as the JSON body returned to callers
    fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.client_message(), self.details())
    }
}

/// JSON error body: `{"error": true, "message": ..., "details": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            error: true,
            message: message.into(),
            details,
        }
    }
}
