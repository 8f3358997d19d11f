use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))
    }
}

/// Signs and verifies HS256 bearer tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Lifetimes beyond chrono's range are capped; configuration bounds them first.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self::with_ttl(
            secret,
            Duration::try_hours(ttl_hours).unwrap_or(Duration::MAX),
        )
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "momo@example.com".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_carries_identity_and_role() {
        let tokens = TokenService::new("test-secret", 24);
        let admin = user(Role::Admin);

        let claims = tokens.verify(&tokens.issue(&admin).unwrap()).unwrap();
        assert_eq!(claims.user_id().unwrap(), admin.id);
        assert_eq!(claims.email, admin.email);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::with_ttl("test-secret", Duration::hours(-2));
        let token = tokens.issue(&user(Role::User)).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = TokenService::new("secret-a", 24);
        let verifier = TokenService::new("secret-b", 24);
        let token = issuer.issue(&user(Role::User)).unwrap();
        assert!(verifier.verify(&token).is_err());
        assert!(verifier.verify("not-a-jwt").is_err());
    }

    #[test]
    fn oversized_lifetime_fails_to_issue_instead_of_panicking() {
        let tokens = TokenService::new("test-secret", i64::MAX);
        assert!(matches!(
            tokens.issue(&user(Role::User)),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn password_hash_verifies_only_the_original_password() {
        let hash = hash_password("Password2025").unwrap();
        assert_ne!(hash, "Password2025");
        assert!(verify_password("Password2025", &hash).unwrap());
        assert!(!verify_password("password2025", &hash).unwrap());
    }
}
