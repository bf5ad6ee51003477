use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Role;

/// bcrypt work factor for stored passwords
pub const PASSWORD_HASH_COST: u32 = 10;

/// Errors from token handling and password hashing
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Token subject is not a valid id: {0}")]
    InvalidSubject(String),
}

/// JWT claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

/// Authenticated caller extracted from a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when the caller is `owner_id` or an admin
    pub fn can_act_for(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.is_admin()
    }
}

/// Issues and verifies HS256 access tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Create a token for an account
    pub fn create_token(&self, id: Uuid, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();

        let claims = Claims {
            sub: id.to_string(),
            role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify signature, expiry and issuer
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Verify a token and resolve its caller
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidSubject(claims.sub.clone()))?;

        Ok(AuthUser {
            id,
            role: claims.role,
        })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .field("ttl_days", &self.ttl.num_days())
            .finish_non_exhaustive()
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, PASSWORD_HASH_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret_key", "mentor-match".to_string(), 7)
    }

    #[test]
    fn test_create_and_verify_token() {
        let service = service();
        let id = Uuid::new_v4();

        let token = service.create_token(id, Role::Alumni).unwrap();
        let user = service.authenticate(&token).unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Alumni);
    }

    #[test]
    fn test_token_expires_in_seven_days() {
        let service = service();
        let token = service.create_token(Uuid::new_v4(), Role::Student).unwrap();
        let claims = service.verify_token(&token).unwrap();

        let expires_in = claims.exp - Utc::now().timestamp();
        assert!(expires_in > 6 * 24 * 3600);
        assert!(expires_in <= 7 * 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = JwtService::new("another_secret", "mentor-match".to_string(), 7);
        let token = other.create_token(Uuid::new_v4(), Role::Admin).unwrap();

        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let other = JwtService::new("test_secret_key", "someone-else".to_string(), 7);
        let token = other.create_token(Uuid::new_v4(), Role::Student).unwrap();

        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtService::new("test_secret_key", "mentor-match".to_string(), -1);
        let token = expired.create_token(Uuid::new_v4(), Role::Student).unwrap();

        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("BearerXYZ"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_can_act_for() {
        let id = Uuid::new_v4();
        let student = AuthUser { id, role: Role::Student };
        let admin = AuthUser { id: Uuid::new_v4(), role: Role::Admin };

        assert!(student.can_act_for(id));
        assert!(!student.can_act_for(Uuid::new_v4()));
        assert!(admin.can_act_for(id));
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("secret1").unwrap();

        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }
}
