//! Authenticated self-service endpoints.
//!
//! Flow Overview:
//! 1) Authenticate via bearer token or `access` cookie.
//! 2) Resolve the current user from the store.
//! 3) Apply the requested updates, gating password changes on freshness.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::principal::require_auth;
use super::user_register::{validate_password, UserResponse};
use super::valid_email;
use crate::api::error::{ApiError, FieldErrors};
use crate::api::state::AuthState;
use crate::password;
use crate::store::{User, UserStore, UserUpdate};
use crate::token::{freshness, now_unix};

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct MeUpdateRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

fn projection(user: User) -> UserResponse {
    UserResponse {
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "The authenticated user profile", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn get_me(
    headers: HeaderMap,
    store: Extension<Arc<dyn UserStore>>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &auth_state)?;
    let user = store
        .find_by_id(principal.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok((StatusCode::OK, Json(projection(user))).into_response())
}

#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = MeUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation failed, or the password change was attempted with a stale token"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn update_me(
    headers: HeaderMap,
    store: Extension<Arc<dyn UserStore>>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<MeUpdateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &auth_state)?;
    // A request without a JSON body is an empty update; a body that fails to
    // parse is rejected rather than silently ignored.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => MeUpdateRequest::default(),
        Err(_) => return Err(ApiError::field("body", "Invalid JSON.")),
    };

    let mut errors = FieldErrors::new();
    if let Some(email) = &request.email {
        if !valid_email(email.trim()) {
            errors.insert("email".to_string(), "Enter a valid email address.".to_string());
        }
    }
    if let Some(password) = &request.password {
        validate_password(password, &mut errors);
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    // The whole update is rejected before anything is staged when the
    // password change is not backed by a recently issued token. Nothing
    // from this request may be persisted in that case, name fields
    // included.
    let password_hash = match &request.password {
        Some(password) => {
            let window = auth_state.config().password_change_window_seconds();
            if !freshness::is_fresh(&principal.token, window, now_unix()) {
                return Err(ApiError::AuthorizationStale);
            }
            Some(password::hash(password)?)
        }
        None => None,
    };

    let user = store
        .update(
            principal.user_id,
            UserUpdate {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
                password_hash,
            },
        )
        .await?;
    Ok((StatusCode::OK, Json(projection(user))).into_response())
}
