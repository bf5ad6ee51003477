use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::models::Credentials;
use crate::routes::error::ApiError;
use crate::routes::AppState;
use crate::services::{bearer_token, hash_password, verify_password, AuthUser};

pub const MISSING_TOKEN: &str = "Not authorized to access this route";
pub const INVALID_TOKEN: &str = "Token is invalid or expired";

/// Handlers taking an `AuthUser` argument require a valid bearer token
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("Application state is not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN))?;

    state.jwt.authenticate(token).map_err(|e| {
        tracing::debug!("Rejected token on {}: {}", req.path(), e);
        ApiError::unauthorized(INVALID_TOKEN)
    })
}

pub fn require_admin(user: &AuthUser) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin access required"))
    }
}

/// The caller must be `owner_id` or an admin
pub fn require_owner(user: &AuthUser, owner_id: Uuid) -> Result<(), ApiError> {
    if user.can_act_for(owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not authorized to access this resource"))
    }
}

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    Ok(web::block(move || hash_password(&password)).await??)
}

/// Resolve a login to an account id, or 401 when the email is unknown or the
/// password does not match
pub async fn check_credentials(
    credentials: Option<Credentials>,
    password: String,
) -> Result<Uuid, ApiError> {
    let Credentials { id, password_hash } =
        credentials.ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let matches = web::block(move || verify_password(&password, &password_hash)).await??;

    if matches {
        Ok(id)
    } else {
        Err(ApiError::unauthorized(INVALID_CREDENTIALS))
    }
}
