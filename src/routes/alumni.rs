use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::models::requests::{check_updatable_fields, ALUMNI_UPDATABLE_FIELDS};
use crate::models::{
    AccountEnvelope, AccountSummary, Alumni, AuthResponse, LoginRequest, RegisterAlumniRequest,
    Role, UpdateAlumniRequest,
};
use crate::routes::auth::{check_credentials, hash_password_blocking, require_owner};
use crate::routes::{ApiError, ApiResult, AppState};
use crate::services::AuthUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/{id}", web::get().to(get_profile))
        .route("/{id}", web::put().to(update_profile));
}

fn summary(alumni: &Alumni) -> AccountSummary {
    AccountSummary {
        id: alumni.id,
        name: alumni.full_name(),
        email: alumni.email.clone(),
        college_name: None,
        role: None,
    }
}

/// POST /api/v1/alumni/register
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterAlumniRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    if state.postgres.alumni_email_exists(&req.email).await? {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = hash_password_blocking(req.password.clone()).await?;
    let alumni = state
        .postgres
        .create_alumni(&req, &password_hash)
        .await
        .map_err(|e| ApiError::duplicate(e, "Email already registered"))?;
    let token = state.jwt.create_token(alumni.id, Role::Alumni)?;

    tracing::info!("Registered alumni {}", alumni.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Alumni(summary(&alumni)),
    }))
}

/// POST /api/v1/alumni/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    if !req.is_complete() {
        return Err(ApiError::bad_request("Email and password required"));
    }

    let credentials = state.postgres.find_alumni_credentials(&req.email).await?;
    let id = check_credentials(credentials, req.password).await?;

    let alumni = state
        .postgres
        .get_alumni(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;
    let token = state.jwt.create_token(alumni.id, Role::Alumni)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Alumni(summary(&alumni)),
    }))
}

/// GET /api/v1/alumni/{id}
async fn get_profile(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let alumni = state
        .postgres
        .get_alumni(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "alumni": alumni })))
}

/// PUT /api/v1/alumni/{id}
///
/// Email, password and account statuses cannot be changed here.
async fn update_profile(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    require_owner(&user, id)?;

    let fields = body
        .as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;
    check_updatable_fields(fields, ALUMNI_UPDATABLE_FIELDS).map_err(ApiError::BadRequest)?;

    let update: UpdateAlumniRequest = serde_json::from_value(body.into_inner())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    update.validate()?;

    let alumni = state
        .postgres
        .update_alumni(id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    tracing::info!("Updated alumni profile {}", alumni.id);

    Ok(HttpResponse::Ok().json(json!({ "success": true, "alumni": alumni })))
}
