use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Token claims. The encoded token is treated as an opaque bearer credential
/// by clients; multiple concurrent tokens per user are valid and there is no
/// revocation list.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.token_expiry_hours;

        Self {
            sub: user_id,
            name: name.into(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hash error: {0}")]
    Hash(String),
}

/// Issue a bearer token for the given user
pub fn issue_token(user_id: i64, name: &str) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;
    let key = EncodingKey::from_secret(secret.as_bytes());

    Ok(encode(&Header::default(), &Claims::new(user_id, name), &key)?)
}

/// Verify a bearer token and return its claims
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;
    let key = DecodingKey::from_secret(secret.as_bytes());

    let data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(data.claims)
}

/// One-way password hash (argon2, PHC string). The plaintext is never stored.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = issue_token(42, "admin").expect("issue");
        assert!(!token.is_empty());

        let claims = verify_token(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.name, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_rejected() {
        let token = issue_token(42, "admin").expect("issue");
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(verify_token(&tampered).is_err());
        assert!(verify_token("not-a-token").is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("admin123").expect("hash");
        assert_ne!(hash, "admin123");
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("admin123", "garbage"));
    }
}
