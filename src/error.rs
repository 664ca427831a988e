// ============================================================================
// ERRORS - Transport errors and the uniform store failure result
// ============================================================================

use thiserror::Error;

/// Error produced by the HTTP layer (transport + API client).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, CORS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request rejected"))]
    Http { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape
    #[error("Parse error: {0}")]
    Decode(String),

    /// The request body could not be serialized
    #[error("Serialization error: {0}")]
    Encode(String),
}

impl ApiError {
    /// Build an `Http` error from a failed response, extracting the server's
    /// `detail` message when the body carries one.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            detail: extract_detail(body),
        }
    }

    /// Message supplied by the server, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error bodies are either `{"detail": "..."}` or a validation list
/// `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(message) if !message.trim().is_empty() => {
            Some(message.clone())
        }
        serde_json::Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Failure category of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Rejected,
    NotAuthenticated,
    Decode,
}

/// Uniform failure result returned by every store operation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ActionError {
    pub kind: FailureKind,
    pub message: String,
}

pub type ActionResult<T = ()> = Result<T, ActionError>;

impl ActionError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Operation invoked while the session is not authenticated
    pub fn not_authenticated() -> Self {
        Self::new(FailureKind::NotAuthenticated, "Not authenticated")
    }

    /// Collapse an `ApiError` into a user-facing failure. The server's detail
    /// message wins; otherwise `fallback` is used.
    pub fn from_api(error: ApiError, fallback: &str) -> Self {
        let kind = match &error {
            ApiError::Network(_) => FailureKind::Network,
            ApiError::Http { .. } => FailureKind::Rejected,
            ApiError::Decode(_) | ApiError::Encode(_) => FailureKind::Decode,
        };
        let message = error
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        Self { kind, message }
    }
}
