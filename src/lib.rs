//! Authentication and session-lifecycle core for a user-management backend.
//!
//! Issues, validates, and refreshes stateless access/refresh token pairs,
//! delivers them through both the response body and `HttpOnly` cookies, and
//! gates password changes behind a token-freshness check.

pub mod api;
pub mod cli;
pub mod password;
pub mod store;
pub mod token;
