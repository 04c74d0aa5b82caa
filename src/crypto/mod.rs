//! Password hashing for stored credentials.
//!
//! Credentials are bcrypt strings (`$2b$10$...`); the cost factor and salt
//! travel inside the stored value, so `BCRYPT_COST` can be raised later
//! without invalidating existing hashes. The KDF is CPU-bound and runs on
//! the blocking thread pool so request handling never stalls on it.

use anyhow::{Context, Result};
use tokio::task;

/// Fixed work factor for new credentials.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a fresh random salt.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")
}

/// Verify a plaintext password against a stored credential.
///
/// A malformed stored hash verifies false rather than erroring; the caller
/// cannot distinguish it from a wrong password, which is the point.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}
