use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::core::calculate_match_score;
use crate::models::responses::list_response;
use crate::models::{
    AlumniMatch, Connection, ConnectionDecision, CreateConnectionRequest, InitiatedBy,
    MatchesQuery, MatchesResponse, NewNotification, NotificationType, SendMessageRequest,
    StudentMatch,
};
use crate::routes::auth::require_owner;
use crate::routes::{ApiError, ApiResult, AppState};
use crate::services::AuthUser;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/student-matches/{student_id}", web::get().to(student_matches))
        .route("/alumni-matches/{alumni_id}", web::get().to(alumni_matches))
        .route("/create", web::post().to(create_connection))
        .route("/send-message", web::post().to(send_message))
        .route("/accept/{connection_id}", web::post().to(accept_connection))
        .route("/reject/{connection_id}", web::post().to(reject_connection))
        .route("/alumni/{alumni_id}/requests", web::get().to(pending_requests))
        .route("/alumni/{alumni_id}/accepted", web::get().to(accepted_connections))
        .route("/alumni/{alumni_id}/all-students", web::get().to(all_students))
        .route("/student/{student_id}/connected", web::get().to(connected_alumni))
        .route("/{student_id}/all-alumni", web::get().to(all_alumni))
        .route("/{connection_id}/messages", web::get().to(messages));
}

/// GET /api/v1/connection/student-matches/{student_id}
///
/// Best active alumni for a student, highest score first.
async fn student_matches(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<MatchesQuery>,
) -> ApiResult<HttpResponse> {
    let student = state
        .postgres
        .get_student(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    let pool = state.postgres.list_active_alumni().await?;
    if pool.is_empty() {
        return Ok(HttpResponse::Ok().json(MatchesResponse::<AlumniMatch>::empty(
            "No alumni available yet",
        )));
    }

    let pool_size = pool.len();
    let limit = state.recommendation_count(query.limit);
    let matches: Vec<AlumniMatch> = state
        .matcher
        .top_offerers(&student, pool, Some(limit))
        .into_iter()
        .map(AlumniMatch::from)
        .collect();

    tracing::info!(
        "Returning {} alumni matches for student {} (from {} candidates)",
        matches.len(),
        student.id,
        pool_size
    );

    Ok(HttpResponse::Ok().json(MatchesResponse::new(matches)))
}

/// GET /api/v1/connection/alumni-matches/{alumni_id}
///
/// Best active students for an alumnus, scored from the student's side.
async fn alumni_matches(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<MatchesQuery>,
) -> ApiResult<HttpResponse> {
    let alumni = state
        .postgres
        .get_alumni(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Alumni not found"))?;

    let pool = state.postgres.list_active_students().await?;
    if pool.is_empty() {
        return Ok(HttpResponse::Ok().json(MatchesResponse::<StudentMatch>::empty(
            "No students available yet",
        )));
    }

    let pool_size = pool.len();
    let limit = state.recommendation_count(query.limit);
    let matches: Vec<StudentMatch> = state
        .matcher
        .top_seekers(&alumni, pool, Some(limit))
        .into_iter()
        .map(StudentMatch::from)
        .collect();

    tracing::info!(
        "Returning {} student matches for alumni {} (from {} candidates)",
        matches.len(),
        alumni.id,
        pool_size
    );

    Ok(HttpResponse::Ok().json(MatchesResponse::new(matches)))
}

/// POST /api/v1/connection/create
///
/// Stores a pending request with the pair's match score and notifies the alumnus.
async fn create_connection(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateConnectionRequest>,
) -> ApiResult<HttpResponse> {
    let (student_id, alumni_id) = match (req.student_id, req.alumni_id) {
        (Some(student_id), Some(alumni_id)) => (student_id, alumni_id),
        _ => return Err(ApiError::bad_request("Student and Alumni IDs required")),
    };
    require_owner(&user, student_id)?;

    let student = state.postgres.get_student(student_id).await?;
    let alumni = state.postgres.get_alumni(alumni_id).await?;
    let (student, alumni) = match (student, alumni) {
        (Some(student), Some(alumni)) => (student, alumni),
        _ => return Err(ApiError::not_found("Student or Alumni not found")),
    };

    if state.postgres.find_connection(student_id, alumni_id).await?.is_some() {
        return Err(ApiError::bad_request("Connection request already exists"));
    }

    let initiated_by = if user.id == student_id {
        InitiatedBy::Student
    } else {
        InitiatedBy::System
    };
    let match_score = calculate_match_score(&student, &alumni);

    let connection = state
        .postgres
        .create_connection(student_id, alumni_id, match_score, initiated_by)
        .await
        .map_err(|e| ApiError::duplicate(e, "Connection request already exists"))?;

    tracing::info!(
        "Connection request {} from student {} to alumni {} (score {})",
        connection.id,
        student_id,
        alumni_id,
        match_score
    );

    let notification = NewNotification {
        recipient_id: alumni_id,
        sender_id: student_id,
        sender_name: student.full_name(),
        notification_type: NotificationType::Connection,
        post_id: None,
        connection_id: Some(connection.id),
        message: "sent you a connection request".to_string(),
    };
    if let Err(e) = state.postgres.create_notification(&notification).await {
        tracing::warn!("Connection {} stored but notification failed: {}", connection.id, e);
    }

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Connection request sent successfully",
        "connection": connection,
    })))
}

async fn respond(
    state: &AppState,
    user: &AuthUser,
    connection_id: Uuid,
    decision: ConnectionDecision,
) -> ApiResult<Connection> {
    let verb = match decision {
        ConnectionDecision::Accept => "accept",
        ConnectionDecision::Reject => "reject",
    };

    let connection = state
        .postgres
        .get_connection(connection_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Connection not found"))?;

    if connection.alumni_id != user.id {
        return Err(ApiError::forbidden(format!(
            "Not authorized to {} this connection",
            verb
        )));
    }

    let next = connection
        .status
        .respond(decision)
        .ok_or_else(|| ApiError::bad_request("Connection is not pending"))?;

    // A concurrent answer may have moved it on since the read
    let updated = state
        .postgres
        .transition_connection(connection.id, connection.status, next)
        .await?
        .ok_or_else(|| ApiError::bad_request("Connection is not pending"))?;

    tracing::info!("Connection {} is now {:?}", updated.id, updated.status);

    Ok(updated)
}

/// POST /api/v1/connection/accept/{connection_id}
async fn accept_connection(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let connection = respond(&state, &user, path.into_inner(), ConnectionDecision::Accept).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Connection accepted successfully",
        "connection": connection,
    })))
}

/// POST /api/v1/connection/reject/{connection_id}
async fn reject_connection(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let connection = respond(&state, &user, path.into_inner(), ConnectionDecision::Reject).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Connection rejected successfully",
        "connection": connection,
    })))
}

/// GET /api/v1/connection/alumni/{alumni_id}/requests
async fn pending_requests(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let alumni_id = path.into_inner();
    require_owner(&user, alumni_id)?;

    let requests = state.postgres.pending_requests_for_alumni(alumni_id).await?;

    Ok(HttpResponse::Ok().json(list_response("connections", &requests)?))
}

/// GET /api/v1/connection/alumni/{alumni_id}/accepted
async fn accepted_connections(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let alumni_id = path.into_inner();
    require_owner(&user, alumni_id)?;

    let connections = state.postgres.accepted_connections_for_alumni(alumni_id).await?;

    Ok(HttpResponse::Ok().json(list_response("connections", &connections)?))
}

/// GET /api/v1/connection/student/{student_id}/connected
async fn connected_alumni(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let student_id = path.into_inner();
    require_owner(&user, student_id)?;

    let connections = state.postgres.connected_alumni_for_student(student_id).await?;

    Ok(HttpResponse::Ok().json(list_response("connections", &connections)?))
}

/// GET /api/v1/connection/{student_id}/all-alumni
async fn all_alumni(
    state: web::Data<AppState>,
    _user: AuthUser,
    _path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let alumni = state.postgres.list_active_alumni().await?;

    Ok(HttpResponse::Ok().json(list_response("alumni", &alumni)?))
}

/// GET /api/v1/connection/alumni/{alumni_id}/all-students
async fn all_students(
    state: web::Data<AppState>,
    _user: AuthUser,
    _path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let students = state.postgres.list_active_students().await?;

    Ok(HttpResponse::Ok().json(list_response("students", &students)?))
}

/// POST /api/v1/connection/send-message
async fn send_message(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let message = req
        .into_inner()
        .into_new_message()
        .ok_or_else(|| ApiError::bad_request("All fields required"))?;
    require_owner(&user, message.sender_id)?;

    let connection = state
        .postgres
        .get_connection(message.connection_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Connection not found"))?;

    if !connection.links(message.sender_id, message.receiver_id) {
        return Err(ApiError::forbidden("Not a participant in this connection"));
    }
    if connection.side_of(message.sender_id) != Some(message.sender_type) {
        return Err(ApiError::bad_request("Sender type does not match the sender"));
    }

    let stored = state.postgres.create_message(&message).await?;

    tracing::debug!("Message {} on connection {}", stored.id, stored.connection_id);

    Ok(HttpResponse::Created().json(json!({ "success": true, "message": stored })))
}

/// GET /api/v1/connection/{connection_id}/messages
///
/// Visible to the two participants and admins.
async fn messages(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let connection = state
        .postgres
        .get_connection(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Connection not found"))?;

    if !connection.involves(user.id) && !user.is_admin() {
        return Err(ApiError::forbidden("Not authorized to view these messages"));
    }

    let messages = state.postgres.messages_for_connection(connection.id).await?;

    Ok(HttpResponse::Ok().json(list_response("messages", &messages)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::routes::test_support::{bearer, lazy_state};
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_matches_require_token() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_state()))
                .configure(configure),
        )
        .await;

        for uri in ["student-matches", "alumni-matches"] {
            let req = test::TestRequest::get()
                .uri(&format!("/{}/{}", uri, Uuid::new_v4()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_create_requires_both_ids() {
        let state = lazy_state();
        let token = bearer(&state, Uuid::new_v4(), Role::Student);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create")
            .insert_header(("Authorization", token))
            .set_json(json!({ "studentId": Uuid::new_v4() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Student and Alumni IDs required");
    }

    #[actix_web::test]
    async fn test_create_on_behalf_of_another_student_forbidden() {
        let state = lazy_state();
        let token = bearer(&state, Uuid::new_v4(), Role::Student);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create")
            .insert_header(("Authorization", token))
            .set_json(json!({ "studentId": Uuid::new_v4(), "alumniId": Uuid::new_v4() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_send_message_requires_all_fields() {
        let state = lazy_state();
        let sender = Uuid::new_v4();
        let token = bearer(&state, sender, Role::Student);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/send-message")
            .insert_header(("Authorization", token))
            .set_json(json!({
                "connectionId": Uuid::new_v4(),
                "senderId": sender,
                "senderType": "student",
                "message": "hello"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_send_message_as_someone_else_forbidden() {
        let state = lazy_state();
        let token = bearer(&state, Uuid::new_v4(), Role::Student);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/send-message")
            .insert_header(("Authorization", token))
            .set_json(json!({
                "connectionId": Uuid::new_v4(),
                "senderId": Uuid::new_v4(),
                "senderType": "alumni",
                "receiverId": Uuid::new_v4(),
                "message": "hello"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_requests_of_another_alumnus_forbidden() {
        let state = lazy_state();
        let token = bearer(&state, Uuid::new_v4(), Role::Alumni);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/alumni/{}/requests", Uuid::new_v4()))
            .insert_header(("Authorization", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
