use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::models::requests::{check_updatable_fields, STUDENT_UPDATABLE_FIELDS};
use crate::models::{
    AccountEnvelope, AccountSummary, AuthResponse, LoginRequest, RegisterStudentRequest, Role,
    Student, UpdateStudentRequest,
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

fn summary(student: &Student) -> AccountSummary {
    AccountSummary {
        id: student.id,
        name: student.full_name(),
        email: student.email.clone(),
        college_name: Some(student.college_name.clone()),
        role: None,
    }
}

/// POST /api/v1/student/register
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterStudentRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    if state.postgres.student_email_exists(&req.email).await? {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let password_hash = hash_password_blocking(req.password.clone()).await?;
    let student = state
        .postgres
        .create_student(&req, &password_hash)
        .await
        .map_err(|e| ApiError::duplicate(e, "Email already registered"))?;
    let token = state.jwt.create_token(student.id, Role::Student)?;

    tracing::info!("Registered student {}", student.id);

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Student(summary(&student)),
    }))
}

/// POST /api/v1/student/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    if !req.is_complete() {
        return Err(ApiError::bad_request("Email and password required"));
    }

    let credentials = state.postgres.find_student_credentials(&req.email).await?;
    let id = check_credentials(credentials, req.password).await?;

    let student = state
        .postgres
        .get_student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;
    let token = state.jwt.create_token(student.id, Role::Student)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
        account: AccountEnvelope::Student(summary(&student)),
    }))
}

/// GET /api/v1/student/{id}
async fn get_profile(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let student = state
        .postgres
        .get_student(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "student": student })))
}

/// PUT /api/v1/student/{id}
///
/// Only the fields in `STUDENT_UPDATABLE_FIELDS` may appear in the body.
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
    check_updatable_fields(fields, STUDENT_UPDATABLE_FIELDS).map_err(ApiError::BadRequest)?;

    let update: UpdateStudentRequest = serde_json::from_value(body.into_inner())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    update.validate()?;

    let student = state
        .postgres
        .update_student(id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    tracing::info!("Updated student profile {}", student.id);

    Ok(HttpResponse::Ok().json(json!({ "success": true, "student": student })))
}
