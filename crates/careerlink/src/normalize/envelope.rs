use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Pagination;

/// `{ success, message, data }` wrapper placed around backend responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl Envelope<Value> {
    /// Adopts a body that is already wrapped (carries a boolean `success`),
    /// otherwise wraps it as a successful payload.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut map) if matches!(map.get("success"), Some(Value::Bool(_))) => {
                let success = map
                    .remove("success")
                    .and_then(|value| value.as_bool())
                    .unwrap_or(true);
                let message = match map.remove("message") {
                    Some(Value::String(message)) => message,
                    _ => String::new(),
                };
                let data = map.remove("data").filter(|data| !data.is_null());
                Self {
                    success,
                    message,
                    data,
                }
            }
            Value::Null => Self {
                success: true,
                message: String::new(),
                data: None,
            },
            other => Self::ok(other),
        }
    }
}

/// Envelope extended with server pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedEnvelope<T> {
    pub fn ok(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
            pagination,
        }
    }
}
