//! Error taxonomy for the auth endpoints and its HTTP mapping.
//!
//! Everything user-facing is recovered here and turned into a structured
//! response; only storage backend failures surface as 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed, missing, or duplicate input. User-correctable.
    #[error("validation failed")]
    Validation(FieldErrors),
    /// Bad login credentials. The message never distinguishes unknown email
    /// from wrong password.
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Bad, expired, or wrong-kind refresh credential.
    #[error("invalid refresh token")]
    InvalidRefresh,
    /// Password change attempted with an access credential that is not
    /// recent enough.
    #[error("authorization is stale")]
    AuthorizationStale,
    /// Missing or invalid access credential on a protected route.
    #[error("unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Single-field validation error.
    #[must_use]
    pub fn field(name: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.to_string(), message.to_string());
        Self::Validation(errors)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                Self::field("email", "A user with this email already exists.")
            }
            StoreError::NotFound => Self::Unauthorized,
            StoreError::Backend(err) => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            Self::AuthenticationFailed => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "detail": "Unable to authenticate with provided credentials."
                })),
            )
                .into_response(),
            Self::InvalidRefresh => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid or expired refresh token." })),
            )
                .into_response(),
            Self::AuthorizationStale => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": "Authorization needed" })),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "detail": "Authentication credentials were not provided or are invalid."
                })),
            )
                .into_response(),
            Self::Internal(err) => {
                error!("Internal error: {err:#}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
