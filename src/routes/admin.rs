use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::models::responses::list_response;
use crate::models::{
    AccountEnvelope, AccountStatus, AccountSummary, Admin, AuthResponse, LoginRequest,
    RegisterAdminRequest, Role,
};
use crate::routes::auth::{check_credentials, hash_password_blocking, require_admin};
use crate::routes::{ApiError, ApiResult, AppState};
use crate::services::AuthUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/stats", web::get().to(stats))
        .route("/alumni", web::get().to(list_alumni))
        .route("/alumni/{id}/approve", web::put().to(approve_alumni))
        .route("/alumni/{id}/reject", web::put().to(reject_alumni))
        .route("/alumni/{id}", web::delete().to(delete_alumni));
}

fn summary(admin: &Admin) -> AccountSummary {
    AccountSummary {
        id: admin.id,
        name: admin.name.clone(),
        email: admin.email.clone(),
        college_name: None,
        role: Some(Role::Admin.as_str().to_string()),
    }
}

/// POST /api/v1/admin/register
///
/// Requires the configured admin secret key.
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterAdminRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();

    if req.secret_key != *state.admin_secret_key {
        tracing::warn!("Admin registration with invalid secret key for {}", req.email);
        return Err(ApiError::forbidden("Invalid secret key"));
    }

    req.validate()?;

    if state.postgres.admin_email_exists(&req.email).await? {
        return Err(ApiError::bad_request("Admin already exists"));
    }

    let password_hash = hash_password_blocking(req.password.clone()).await?;
    let admin = state
        .postgres
        .create_admin(&req, &password_hash)
        .await
        .map_err(|e| ApiError::duplicate(e, "Admin already exists"))?;
    let token = state.jwt.create_token(admin.id, Role::Admin)?;

    tracing::info!("Registered admin {}", admin.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Admin(summary(&admin)),
    }))
}

/// POST /api/v1/admin/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    if !req.is_complete() {
        return Err(ApiError::bad_request("Email and password required"));
    }

    let credentials = state.postgres.find_admin_credentials(&req.email).await?;
    let id = check_credentials(credentials, req.password).await?;

    let admin = state
        .postgres
        .get_admin(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;
    let token = state.jwt.create_token(admin.id, Role::Admin)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Admin(summary(&admin)),
    }))
}

/// GET /api/v1/admin/stats
async fn stats(state: web::Data<AppState>, user: AuthUser) -> ApiResult<HttpResponse> {
    require_admin(&user)?;

    let stats = state.postgres.platform_stats().await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "stats": stats })))
}

/// GET /api/v1/admin/alumni
async fn list_alumni(state: web::Data<AppState>, user: AuthUser) -> ApiResult<HttpResponse> {
    require_admin(&user)?;

    let alumni = state.postgres.list_all_alumni().await?;

    Ok(HttpResponse::Ok().json(list_response("alumni", &alumni)?))
}

async fn set_status(
    state: &AppState,
    id: Uuid,
    status: AccountStatus,
    message: &str,
) -> ApiResult<HttpResponse> {
    let alumni = state
        .postgres
        .set_alumni_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "alumni": alumni,
    })))
}

/// PUT /api/v1/admin/alumni/{id}/approve
async fn approve_alumni(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_admin(&user)?;
    set_status(&state, path.into_inner(), AccountStatus::Active, "Alumni approved successfully").await
}

/// PUT /api/v1/admin/alumni/{id}/reject
async fn reject_alumni(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_admin(&user)?;
    set_status(&state, path.into_inner(), AccountStatus::Rejected, "Alumni rejected").await
}

/// DELETE /api/v1/admin/alumni/{id}
///
/// Also removes the alumnus' connections.
async fn delete_alumni(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    require_admin(&user)?;

    if !state.postgres.delete_alumni(path.into_inner()).await? {
        return Err(ApiError::not_found("Alumni not found"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Alumni deleted successfully",
    })))
}
