//! In-memory stand-in for the CareerLink backend.
//!
//! [`MockStore`] keeps every table behind one mutex and answers the same
//! operations as the REST client. [`mock_api_router`] serves it over HTTP in
//! the backend's reference-preserving wire format, so the client and the
//! normalizer can be exercised without the real service.

mod router;
mod seed;
mod store;
mod wire;

pub use router::mock_api_router;
pub use seed::{DEMO_ADMIN_TOKEN, DEMO_EMPLOYER_TOKEN};
pub use store::MockStore;
pub use wire::ReferenceEncoder;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Domain failures raised by the mock data layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("Already applied to this job")]
    AlreadyApplied { job_id: String, student_id: String },
    #[error("{entity} already exists")]
    Duplicate { entity: &'static str, name: String },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("mock data store unavailable")]
    Unavailable,
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyApplied { .. } | Self::Duplicate { .. } | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let payload = json!({
            "success": false,
            "message": self.to_string(),
        });
        (self.status_code(), axum::Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests;
