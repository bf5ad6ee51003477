use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::models::responses::list_response;
use crate::models::Notification;
use crate::routes::auth::require_owner;
use crate::routes::{ApiError, ApiResult, AppState};
use crate::services::AuthUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/{user_id}", web::get().to(all_notifications))
        .route("/{user_id}/unread", web::get().to(unread_notifications))
        .route("/{notification_id}/read", web::put().to(mark_read))
        .route("/{notification_id}", web::delete().to(delete_notification));
}

async fn list(state: &AppState, user: &AuthUser, recipient_id: Uuid, unread_only: bool) -> ApiResult<HttpResponse> {
    require_owner(user, recipient_id)?;

    let notifications = state.postgres.notifications_for(recipient_id, unread_only).await?;

    Ok(HttpResponse::Ok().json(list_response("notifications", &notifications)?))
}

/// Look up a notification addressed to the caller
async fn owned_notification(state: &AppState, user: &AuthUser, id: Uuid) -> ApiResult<Notification> {
    let notification = state
        .postgres
        .get_notification(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    require_owner(user, notification.recipient_id)?;

    Ok(notification)
}

/// GET /api/v1/notification/{user_id}
async fn all_notifications(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    list(&state, &user, path.into_inner(), false).await
}

/// GET /api/v1/notification/{user_id}/unread
async fn unread_notifications(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    list(&state, &user, path.into_inner(), true).await
}

/// PUT /api/v1/notification/{notification_id}/read
async fn mark_read(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification = owned_notification(&state, &user, path.into_inner()).await?;

    let notification = state
        .postgres
        .mark_notification_read(notification.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "notification": notification })))
}

/// DELETE /api/v1/notification/{notification_id}
async fn delete_notification(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification = owned_notification(&state, &user, path.into_inner()).await?;

    if !state.postgres.delete_notification(notification.id).await? {
        return Err(ApiError::not_found("Notification not found"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Notification deleted",
    })))
}
