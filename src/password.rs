//! Password hashing collaborator (argon2id, PHC strings).

use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

/// Hash a plaintext password into a PHC string.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?
        .to_string();
    Ok(phc)
}

/// Verify a plaintext password against a stored PHC string.
///
/// Unparsable hashes verify as false rather than erroring out.
#[must_use]
pub fn verify(stored_hash: &str, plaintext: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
