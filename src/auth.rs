// Copyright (c) Perch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Password hashing and stateless token auth.
//!
//! Passwords are hashed with Argon2id; sessions are HS256 JWTs carrying the
//! username in `sub`, verified against the static secret from [`Config`].

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ApiError;

/// Hash a password using Argon2id, returning the PHC hash string for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(rand::thread_rng());
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal("failed to hash password".to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| ApiError::Internal("invalid password hash format".to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)
}

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued for
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mint an access token for a username.
pub fn mint_token(username: &str, secret: &str, ttl_secs: u64) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: now + ttl_secs as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| ApiError::Internal("failed to sign token".to_string()))
}

/// Verify a token signature and expiry, returning its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// Extractor for the authenticated user, from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = verify_token(token, &Config::get().auth.jwt_secret)?;
        Ok(AuthUser {
            username: claims.sub,
        })
    }
}

/// Extractor for endpoints that personalize output when a token is present
/// but remain public without one.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "SecurePass123!";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_wrong_password() {
        let password = "SecurePass123!";
        let hash = hash_password(password).unwrap();
        assert!(verify_password("WrongPass123!", &hash).is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let token = mint_token("ada", "test-secret", 3600).unwrap();
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "ada");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret() {
        let token = mint_token("ada", "test-secret", 3600).unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Already-expired token (issued in the past, zero ttl)
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "ada".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(verify_token(&token, "test-secret").is_err());
    }
}
