// Error handling module
// Defines the client-side error taxonomy and backend error payload extraction

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the API client.
///
/// Every rejection carries enough information (HTTP status, backend payload)
/// for the caller to produce a user-facing message; nothing is swallowed.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. `body` is the error
    /// payload exactly as returned (`{detail}`, `{error}` or a field map).
    #[error("API error: {status} - {}", error_message(.body))]
    Api { status: u16, body: Value },

    /// No response was received (DNS, connect, timeout, ...). Never triggers
    /// a token refresh.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client-side validation failed; no request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Session persistence failed (SQLite I/O, serialization).
    #[error("Session store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status of the backend response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[allow(dead_code)]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Human-readable message for display.
    ///
    /// For backend errors this digs through the common envelope shapes the
    /// API uses; everything else falls back to the Display impl.
    pub fn message(&self) -> String {
        match self {
            ApiError::Api { status, body } => {
                let extracted = error_message(body);
                if extracted.is_empty() {
                    format!("request failed with status {}", status)
                } else {
                    extracted
                }
            }
            other => other.to_string(),
        }
    }
}

/// Pull a displayable message out of a backend error payload.
///
/// The backend is not uniform: DRF permission/auth errors use `{"detail": ...}`,
/// the custom views use `{"error": ...}` or `{"message": ...}`, and serializer
/// validation returns `{"field": ["msg", ...]}`. First match wins.
fn error_message(body: &Value) -> String {
    for key in ["detail", "error", "message"] {
        if let Some(msg) = body.get(key).and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    // Field-level validation map: take the first field's first message.
    if let Some(map) = body.as_object() {
        for (field, value) in map {
            let first = match value {
                Value::Array(items) => items.first().and_then(|v| v.as_str()),
                Value::String(s) => Some(s.as_str()),
                _ => None,
            };
            if let Some(msg) = first {
                return format!("{}: {}", field, msg);
            }
        }
    }

    match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
