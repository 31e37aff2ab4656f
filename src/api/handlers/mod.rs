pub mod health;
pub use self::health::health;

pub mod user_register;
pub use self::user_register::register;

pub mod user_login;
pub use self::user_login::login;

pub mod token_refresh;
pub use self::token_refresh::refresh;

pub mod me;
pub mod principal;

// common functions for the handlers
use axum::http::{
    header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use regex::Regex;

use crate::api::state::AuthConfig;

pub(crate) const ACCESS_COOKIE_NAME: &str = "access";
pub(crate) const REFRESH_COOKIE_NAME: &str = "refresh";

pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Build an `HttpOnly` cookie carrying a token. `Secure`/`SameSite` come
/// from configuration.
pub(crate) fn token_cookie(
    config: &AuthConfig,
    name: &str,
    value: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly");
    if let Some(same_site) = config.cookie_same_site() {
        cookie.push_str("; SameSite=");
        cookie.push_str(same_site);
    }
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read a cookie value by name.
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Access token from the `Authorization` header, falling back to the
/// `access` cookie.
pub(crate) fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers).or_else(|| cookie_value(headers, ACCESS_COOKIE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("secret".to_string()))
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn token_cookie_is_http_only_by_default() {
        let cookie = token_cookie(&config(), "access", "abc").expect("cookie");
        assert_eq!(cookie.to_str().unwrap(), "access=abc; Path=/; HttpOnly");
    }

    #[test]
    fn token_cookie_honors_secure_and_same_site() {
        let config = config()
            .with_cookie_secure(true)
            .with_cookie_same_site(Some("Lax".to_string()));
        let cookie = token_cookie(&config, "refresh", "abc").expect("cookie");
        assert_eq!(
            cookie.to_str().unwrap(),
            "refresh=abc; Path=/; HttpOnly; SameSite=Lax; Secure"
        );
    }

    #[test]
    fn cookie_value_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("refresh=r-token; access=a-token"),
        );
        assert_eq!(
            cookie_value(&headers, "access"),
            Some("a-token".to_string())
        );
        assert_eq!(
            cookie_value(&headers, "refresh"),
            Some("r-token".to_string())
        );
        assert_eq!(cookie_value(&headers, "session"), None);
    }

    #[test]
    fn bearer_token_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        headers.insert(COOKIE, HeaderValue::from_static("access=from-cookie"));
        assert_eq!(
            extract_access_token(&headers),
            Some("from-header".to_string())
        );

        headers.remove(AUTHORIZATION);
        assert_eq!(
            extract_access_token(&headers),
            Some("from-cookie".to_string())
        );
    }

    #[test]
    fn empty_bearer_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_access_token(&headers), None);
    }
}
