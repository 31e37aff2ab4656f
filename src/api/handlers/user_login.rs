//! Login: credential check, pair issuance, dual-channel delivery.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{token_cookie, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::api::error::ApiError;
use crate::api::state::AuthState;
use crate::password;
use crate::store::UserStore;
use crate::token::now_unix;

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[utoipa::path(
    post,
    path = "/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair in the body and in HttpOnly cookies", body = TokenPairResponse),
        (status = 400, description = "Authentication failed"),
    ),
    tag = "token"
)]
#[instrument(skip_all)]
pub async fn login(
    store: Extension<Arc<dyn UserStore>>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::AuthenticationFailed);
    };

    // One failure path for unknown email, wrong password, and inactive
    // accounts: the response must not allow user enumeration.
    let user = store
        .find_by_email(&request.email)
        .await?
        .filter(|user| user.is_active)
        .filter(|user| password::verify(&user.password_hash, &request.password))
        .ok_or(ApiError::AuthenticationFailed)?;

    let now = now_unix();
    let pair = auth_state
        .issuer()
        .issue_pair(user.id, now)
        .context("Failed to sign token pair")?;
    store.record_login(user.id, now).await?;

    // Body and cookies carry the same strings; the two channels must never
    // diverge within one response.
    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        token_cookie(auth_state.config(), ACCESS_COOKIE_NAME, &pair.access)
            .context("Failed to build access cookie")?,
    );
    headers.append(
        SET_COOKIE,
        token_cookie(auth_state.config(), REFRESH_COOKIE_NAME, &pair.refresh)
            .context("Failed to build refresh cookie")?,
    );

    let body = TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    };
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}
