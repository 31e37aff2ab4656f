//! User creation endpoint.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::valid_email;
use crate::api::error::{ApiError, FieldErrors};
use crate::password;
use crate::store::{NewUser, UserStore};

pub(crate) const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(ToSchema, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Public projection of a user. The password hash never leaves the store
/// and the plaintext is never echoed back.
#[derive(ToSchema, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub(crate) fn validate_password(password: &str, errors: &mut FieldErrors) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            "password".to_string(),
            format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failed, field errors in the body"),
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn register(
    store: Extension<Arc<dyn UserStore>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::field("body", "Missing payload"));
    };

    let mut errors = FieldErrors::new();
    if !valid_email(request.email.trim()) {
        errors.insert("email".to_string(), "Enter a valid email address.".to_string());
    }
    validate_password(&request.password, &mut errors);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let password_hash = password::hash(&request.password)?;
    let user = store
        .create(NewUser {
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    debug!("created user {}", user.id);

    let response = UserResponse {
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}
