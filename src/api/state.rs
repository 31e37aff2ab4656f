//! Auth configuration and shared per-process state.

use secrecy::{ExposeSecret, SecretString};

use crate::token::freshness::DEFAULT_PASSWORD_CHANGE_WINDOW_SECONDS;
use crate::token::issuer::{DEFAULT_ACCESS_TTL_SECONDS, DEFAULT_REFRESH_TTL_SECONDS};
use crate::token::TokenIssuer;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    jwt_secret: SecretString,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    password_change_window_seconds: i64,
    cookie_secure: bool,
    cookie_same_site: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn new(jwt_secret: SecretString) -> Self {
        Self {
            jwt_secret,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            password_change_window_seconds: DEFAULT_PASSWORD_CHANGE_WINDOW_SECONDS,
            cookie_secure: false,
            cookie_same_site: None,
        }
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, access: i64, refresh: i64) -> Self {
        self.access_ttl_seconds = access;
        self.refresh_ttl_seconds = refresh;
        self
    }

    #[must_use]
    pub fn with_password_change_window_seconds(mut self, seconds: i64) -> Self {
        self.password_change_window_seconds = seconds;
        self
    }

    /// Mark cookies `Secure`. Deployment decides; never hard-coded.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Optional `SameSite` attribute for issued cookies.
    #[must_use]
    pub fn with_cookie_same_site(mut self, same_site: Option<String>) -> Self {
        self.cookie_same_site = same_site;
        self
    }

    #[must_use]
    pub fn password_change_window_seconds(&self) -> i64 {
        self.password_change_window_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub fn cookie_same_site(&self) -> Option<&str> {
        self.cookie_same_site.as_deref()
    }
}

/// Process-wide auth state: the issuer plus its configuration.
pub struct AuthState {
    config: AuthConfig,
    issuer: TokenIssuer,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let issuer = TokenIssuer::new(config.jwt_secret.expose_secret().as_bytes())
            .with_ttls(config.access_ttl_seconds, config.refresh_ttl_seconds);
        Self { config, issuer }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }
}
