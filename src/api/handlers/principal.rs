//! Authenticated principal extraction.
//!
//! The gate accepts a bearer token first and the `access` cookie as a
//! fallback. Only a token that verifies AND carries the access kind
//! authenticates a request; refresh tokens are never accepted here.

use axum::http::HeaderMap;
use uuid::Uuid;

use super::extract_access_token;
use crate::api::error::ApiError;
use crate::api::state::AuthState;
use crate::token::TokenKind;

/// Authenticated user context derived from a verified access token.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    /// The raw presented token; the freshness policy peeks at its claims.
    pub token: String,
}

/// Resolve the presented access token into a principal, or 401.
pub fn require_auth(headers: &HeaderMap, auth_state: &AuthState) -> Result<Principal, ApiError> {
    let Some(token) = extract_access_token(headers) else {
        return Err(ApiError::Unauthorized);
    };
    let claims = auth_state
        .issuer()
        .codec()
        .decode(&token)
        .map_err(|_| ApiError::Unauthorized)?;
    if claims.token_type != TokenKind::Access {
        return Err(ApiError::Unauthorized);
    }
    Ok(Principal {
        user_id: claims.sub,
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::AuthConfig;
    use crate::token::now_unix;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use secrecy::SecretString;

    fn auth_state() -> AuthState {
        AuthState::new(AuthConfig::new(SecretString::from("secret".to_string())))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn accepts_a_valid_access_token() {
        let state = auth_state();
        let user_id = Uuid::new_v4();
        let pair = state.issuer().issue_pair(user_id, now_unix()).unwrap();

        let principal = require_auth(&bearer(&pair.access), &state).expect("principal");
        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.token, pair.access);
    }

    #[test]
    fn rejects_refresh_tokens_and_garbage() {
        let state = auth_state();
        let pair = state.issuer().issue_pair(Uuid::new_v4(), now_unix()).unwrap();

        assert!(require_auth(&bearer(&pair.refresh), &state).is_err());
        assert!(require_auth(&bearer("garbage"), &state).is_err());
        assert!(require_auth(&HeaderMap::new(), &state).is_err());
    }
}
