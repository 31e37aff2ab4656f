//! Freshness policy for sensitive mutations.
//!
//! A password change is only allowed while the presented access token was
//! issued recently. The issued-at instant comes from the unsigned peek, so
//! this is a heuristic gate layered on top of the verified auth gate, never
//! a replacement for it.

use super::peek_issued_at;

/// Maximum age, in seconds, of an access token allowed to authorize a
/// password change.
pub const DEFAULT_PASSWORD_CHANGE_WINDOW_SECONDS: i64 = 60;

/// Whether the token was issued less than `window_seconds` ago.
///
/// Fail-closed: any parse failure counts as stale.
#[must_use]
pub fn is_fresh(token: &str, window_seconds: i64, now: i64) -> bool {
    match peek_issued_at(token) {
        Ok(iat) => now - iat < window_seconds,
        Err(_) => false,
    }
}
