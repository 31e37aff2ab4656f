//! Access-token refresh from a body field or the refresh cookie.

use anyhow::Context;
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{cookie_value, token_cookie, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::api::error::ApiError;
use crate::api::state::AuthState;
use crate::token::now_unix;

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct AccessResponse {
    pub access: String,
}

#[utoipa::path(
    post,
    path = "/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token in the body and in an HttpOnly cookie", body = AccessResponse),
        (status = 400, description = "No refresh token in the body or cookie"),
        (status = 401, description = "Invalid or expired refresh token"),
    ),
    tag = "token"
)]
#[instrument(skip_all)]
pub async fn refresh(
    auth_state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
    payload: Option<Json<RefreshRequest>>,
) -> Result<Response, ApiError> {
    // Policy: a non-empty body field wins; the cookie is a fallback only
    // when the body does not carry one.
    let from_body = payload
        .and_then(|Json(request)| request.refresh)
        .filter(|token| !token.trim().is_empty());
    let Some(token) = from_body.or_else(|| cookie_value(&headers, REFRESH_COOKIE_NAME)) else {
        return Err(ApiError::field("refresh", "This field is required."));
    };

    let access = auth_state
        .issuer()
        .refresh_access(&token, now_unix())
        .map_err(|_| ApiError::InvalidRefresh)?;

    // The refresh token is not re-delivered; only the access channel is
    // updated.
    let mut response_headers = HeaderMap::new();
    response_headers.append(
        SET_COOKIE,
        token_cookie(auth_state.config(), ACCESS_COOKIE_NAME, &access)
            .context("Failed to build access cookie")?,
    );

    Ok((StatusCode::OK, response_headers, Json(AccessResponse { access })).into_response())
}
