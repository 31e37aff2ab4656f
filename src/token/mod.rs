//! Signed access/refresh credentials.
//!
//! Tokens are stateless HS256 JWTs: subject, issued-at, expiry, and kind.
//! `decode` always verifies the signature; `peek_issued_at` never does and
//! exists only to feed the freshness heuristic.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

pub mod freshness;
pub mod issuer;

pub use issuer::{TokenIssuer, TokenPair};

/// Kind of credential a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("unexpected token kind")]
    WrongKind,
}

/// Encodes and decodes signed tokens with a shared secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Mint a signed token.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or signing fails.
    pub fn encode(
        &self,
        sub: Uuid,
        kind: TokenKind,
        iat: i64,
        exp: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub,
            iat,
            exp,
            token_type: kind,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Expiry is strict: a token reaching its `exp` instant is already
    /// expired.
    ///
    /// # Errors
    ///
    /// `SignatureInvalid` when the signature check fails, `Expired` when the
    /// token is past its expiry, `Malformed` for anything unparsable.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: the freshness boundary tests depend on exact expiry.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;
        // The library accepts exp == now; here the expiry instant itself is
        // already out.
        if claims.exp <= now_unix() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

/// Extract `iat` from a token WITHOUT verifying the signature.
///
/// Trust boundary: a client can hand us a token whose claims parse but whose
/// signature would never verify, so the returned instant is a heuristic for
/// the freshness policy only. Authorization always goes through
/// [`TokenCodec::decode`]. Reviewed and intentional; do not "harden" this
/// into a verified decode.
///
/// # Errors
///
/// `Malformed` when the token does not have a parsable claims segment.
pub fn peek_issued_at(token: &str) -> Result<i64, TokenError> {
    use base64ct::{Base64UrlUnpadded, Encoding};

    let claims_segment = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let bytes =
        Base64UrlUnpadded::decode_vec(claims_segment).map_err(|_| TokenError::Malformed)?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;
    value
        .get("iat")
        .and_then(serde_json::Value::as_i64)
        .ok_or(TokenError::Malformed)
}

/// Current unix time in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret")
    }

    #[test]
    fn round_trips_claims() {
        let sub = Uuid::new_v4();
        let now = now_unix();
        let token = codec()
            .encode(sub, TokenKind::Access, now, now + 300)
            .expect("encode");

        let claims = codec().decode(&token).expect("decode");
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.iat, now);
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn rejects_expired_token() {
        let now = now_unix();
        let token = codec()
            .encode(Uuid::new_v4(), TokenKind::Access, now - 600, now - 300)
            .expect("encode");

        assert_eq!(codec().decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn rejects_token_at_exact_expiry() {
        // A token whose exp equals the current second is already expired.
        let now = now_unix();
        let token = codec()
            .encode(Uuid::new_v4(), TokenKind::Access, now - 300, now)
            .expect("encode");

        assert_eq!(codec().decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = now_unix();
        let token = codec()
            .encode(Uuid::new_v4(), TokenKind::Access, now, now + 300)
            .expect("encode");

        let other = TokenCodec::new(b"another-secret");
        assert_eq!(other.decode(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(codec().decode("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(codec().decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn peek_reads_iat_without_verification() {
        let now = now_unix();
        let token = codec()
            .encode(Uuid::new_v4(), TokenKind::Access, now, now + 300)
            .expect("encode");

        assert_eq!(peek_issued_at(&token), Ok(now));

        // Truncating the signature must not matter to the peek, that is the
        // whole point of the unsigned parse.
        let unsigned = token.rsplit_once('.').map(|(head, _)| head).unwrap();
        let tampered = format!("{unsigned}.AAAA");
        assert_eq!(peek_issued_at(&tampered), Ok(now));
        assert_eq!(codec().decode(&tampered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn peek_fails_on_unparsable_input() {
        assert_eq!(peek_issued_at("no-dots-here"), Err(TokenError::Malformed));
        assert_eq!(peek_issued_at("a.!!!.c"), Err(TokenError::Malformed));
    }
}
