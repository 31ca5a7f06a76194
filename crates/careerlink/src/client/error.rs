use serde_json::Value;

/// Failure of a call against the REST backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    /// The backend answered 2xx with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Builds the error for a non-2xx response, preferring the body's
    /// `message` when it carries one.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        Self::Http { status, message }
    }

    /// True when the backend could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
