//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret from config.
//! Validity is fully determined by signature and expiry; the server keeps
//! no session table, so a token stays valid until it expires or the secret
//! rotates.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (`users.id`).
    pub sub: i64,
    /// Normalized email at issuance time.
    pub email: String,
    pub role: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// The single outward-facing verification failure. Malformed tokens, bad
/// signatures, and expired tokens are deliberately indistinguishable.
#[derive(Debug, thiserror::Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// Signing/verification keys derived once from the configured secret and
/// carried in `AppState`.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Mint a token for the given identity, expiring `ttl` from now.
    pub fn issue(&self, user_id: i64, email: &str, role: &str) -> Result<String> {
        self.issue_at(Utc::now(), user_id, email, role)
    }

    fn issue_at(
        &self,
        now: DateTime<Utc>,
        user_id: i64,
        email: &str,
        role: &str,
    ) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to encode session token")
    }

    /// Decode and validate a token, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", 7)
    }

    #[test]
    fn test_round_trip() {
        let keys = keys();
        let token = keys.issue(42, "avery@example.com", "user").unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "avery@example.com");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_valid_six_days_after_issuance() {
        let keys = keys();
        let issued = Utc::now() - Duration::days(6);
        let token = keys
            .issue_at(issued, 1, "avery@example.com", "user")
            .unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn test_expired_eight_days_after_issuance() {
        let keys = keys();
        let issued = Utc::now() - Duration::days(8);
        let token = keys
            .issue_at(issued, 1, "avery@example.com", "user")
            .unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().issue(1, "avery@example.com", "user").unwrap();
        let other = TokenKeys::new("a-different-secret", 7);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let keys = keys();
        assert!(keys.verify("").is_err());
        assert!(keys.verify("not.a.jwt").is_err());

        // Tampering with the payload invalidates the signature
        let token = keys.issue(1, "avery@example.com", "user").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = "eyJzdWIiOjk5OX0";
        let tampered = parts.join(".");
        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn test_custom_ttl() {
        let keys = TokenKeys::new("test-secret", 1);
        let issued = Utc::now() - Duration::days(2);
        let token = keys
            .issue_at(issued, 1, "avery@example.com", "user")
            .unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
