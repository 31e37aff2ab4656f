//! Minting of access/refresh pairs.

use super::{TokenCodec, TokenError, TokenKind};
use uuid::Uuid;

/// Lifetime of an access token, mirroring the usual short-lived default.
pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 5 * 60;
/// Lifetime of a refresh token. Must exceed the access lifetime.
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;

/// An access/refresh pair minted together for one subject.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Stateless issuer: nothing is persisted and no revocation list exists.
pub struct TokenIssuer {
    codec: TokenCodec,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            codec: TokenCodec::new(secret),
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_ttls(mut self, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        self.access_ttl_seconds = access_ttl_seconds;
        self.refresh_ttl_seconds = refresh_ttl_seconds;
        self
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Mint an access/refresh pair for a verified identity.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        now: i64,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access = self.codec.encode(
            user_id,
            TokenKind::Access,
            now,
            now + self.access_ttl_seconds,
        )?;
        let refresh = self.codec.encode(
            user_id,
            TokenKind::Refresh,
            now,
            now + self.refresh_ttl_seconds,
        )?;
        Ok(TokenPair { access, refresh })
    }

    /// Derive a new access token from a valid refresh token.
    ///
    /// The refresh token is not rotated; it stays valid until it expires.
    ///
    /// # Errors
    ///
    /// Any decode failure, or a token whose kind is not `refresh`, is an
    /// invalid refresh credential.
    pub fn refresh_access(&self, refresh: &str, now: i64) -> Result<String, TokenError> {
        let claims = self.codec.decode(refresh)?;
        if claims.token_type != TokenKind::Refresh {
            return Err(TokenError::WrongKind);
        }
        self.codec
            .encode(
                claims.sub,
                TokenKind::Access,
                now,
                now + self.access_ttl_seconds,
            )
            .map_err(|_| TokenError::Malformed)
    }
}
