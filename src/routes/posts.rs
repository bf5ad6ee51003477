use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::models::requests::sanitize_input;
use crate::models::responses::{item_response, list_response};
use crate::models::{
    CommentRequest, CreatePostRequest, ExploreQuery, LikeRequest, NewNotification,
    NotificationType, ParticipantType, Post, UpdatePostRequest,
};
use crate::routes::{ApiError, ApiResult, AppState};
use crate::services::{AuthUser, PostFilter, EXPLORE_LIMIT};

const POST_NOT_FOUND: &str = "Post not found";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create_post))
        .route("/explore", web::get().to(explore))
        .route("/user/{user_id}", web::get().to(posts_by_user))
        .route("/category/{category}", web::get().to(posts_by_category))
        .route("/search/{query}", web::post().to(search_posts))
        .route("/{post_id}", web::get().to(get_post))
        .route("/{post_id}", web::put().to(update_post))
        .route("/{post_id}", web::delete().to(delete_post))
        .route("/{post_id}/like", web::post().to(like_post))
        .route("/{post_id}/save", web::post().to(save_post))
        .route("/{post_id}/comment", web::post().to(comment_on_post))
        .route("/{post_id}/comments", web::get().to(comments));
}

/// Notify a post's author of someone else's activity; failures are logged only
async fn notify_author(
    state: &AppState,
    post: &Post,
    sender: &AuthUser,
    sender_name: Option<String>,
    notification_type: NotificationType,
    action: &str,
) {
    if post.author_id == sender.id {
        return;
    }

    let notification = NewNotification {
        recipient_id: post.author_id,
        sender_id: sender.id,
        sender_name: sender_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Someone".to_string()),
        notification_type,
        post_id: Some(post.id),
        connection_id: None,
        message: format!("{} your post: \"{}\"", action, post.title),
    };

    if let Err(e) = state.postgres.create_notification(&notification).await {
        tracing::warn!("Failed to notify author of post {}: {}", post.id, e);
    }
}

/// Fetch a live post the caller wrote
async fn authored_post(state: &AppState, user: &AuthUser, post_id: Uuid, verb: &str) -> ApiResult<Post> {
    let post = state
        .postgres
        .get_post(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    if post.author_id != user.id {
        return Err(ApiError::forbidden(format!("Not authorized to {} this post", verb)));
    }

    Ok(post)
}

/// POST /api/v1/post/create
async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let new_post = req
        .into_inner()
        .into_new_post(user.id, ParticipantType::from_role(user.role))
        .ok_or_else(|| ApiError::bad_request("Title and content required"))?;

    let post = state.postgres.create_post(&new_post).await?;

    tracing::info!("Post {} created by {}", post.id, user.id);

    Ok(HttpResponse::Created().json(item_response("Post created successfully", Some("post"), &post)?))
}

/// GET /api/v1/post/explore?category=&postType=&search=
async fn explore(
    state: web::Data<AppState>,
    _user: AuthUser,
    query: web::Query<ExploreQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter {
        category: query.category.filter(|c| !c.is_empty()),
        post_type: query.post_type,
        search: query.search.filter(|s| !s.trim().is_empty()),
        limit: Some(EXPLORE_LIMIT),
        ..PostFilter::default()
    };

    let posts = state.postgres.list_posts(&filter).await?;

    Ok(HttpResponse::Ok().json(list_response("posts", &posts)?))
}

/// GET /api/v1/post/{post_id}
///
/// Counts as a view.
async fn get_post(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post = state
        .postgres
        .view_post(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

/// PUT /api/v1/post/{post_id}
async fn update_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> ApiResult<HttpResponse> {
    let post = authored_post(&state, &user, path.into_inner(), "update").await?;

    let updated = state
        .postgres
        .update_post(post.id, &req.into_inner().sanitized())
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    Ok(HttpResponse::Ok().json(item_response("Post updated successfully", Some("post"), &updated)?))
}

/// DELETE /api/v1/post/{post_id}
///
/// Soft delete: the post disappears from every listing and lookup.
async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post = authored_post(&state, &user, path.into_inner(), "delete").await?;

    if !state.postgres.soft_delete_post(post.id).await? {
        return Err(ApiError::not_found(POST_NOT_FOUND));
    }

    tracing::info!("Post {} deleted by {}", post.id, user.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}

/// GET /api/v1/post/user/{user_id}
async fn posts_by_user(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let filter = PostFilter {
        author_id: Some(path.into_inner()),
        ..PostFilter::default()
    };
    let posts = state.postgres.list_posts(&filter).await?;

    Ok(HttpResponse::Ok().json(list_response("posts", &posts)?))
}

/// GET /api/v1/post/category/{category}
async fn posts_by_category(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let filter = PostFilter {
        category: Some(path.into_inner()),
        ..PostFilter::default()
    };
    let posts = state.postgres.list_posts(&filter).await?;

    Ok(HttpResponse::Ok().json(list_response("posts", &posts)?))
}

/// POST /api/v1/post/search/{query}
async fn search_posts(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let filter = PostFilter {
        search: Some(path.into_inner()),
        ..PostFilter::default()
    };
    let posts = state.postgres.list_posts(&filter).await?;

    Ok(HttpResponse::Ok().json(list_response("posts", &posts)?))
}

/// POST /api/v1/post/{post_id}/like
///
/// Toggles the caller's like; a new like notifies the author.
async fn like_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: Option<web::Json<LikeRequest>>,
) -> ApiResult<HttpResponse> {
    let toggled = state
        .postgres
        .toggle_like(path.into_inner(), user.id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    if toggled.active {
        let sender_name = body.and_then(|b| b.into_inner().sender_name);
        notify_author(&state, &toggled.post, &user, sender_name, NotificationType::Like, "liked").await;
    }

    let message = if toggled.active { "Post liked" } else { "Post unliked" };

    Ok(HttpResponse::Ok().json(item_response(message, Some("post"), &toggled.post)?))
}

/// POST /api/v1/post/{post_id}/save
async fn save_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let toggled = state
        .postgres
        .toggle_save(path.into_inner(), user.id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    let message = if toggled.active { "Post saved" } else { "Post unsaved" };

    Ok(HttpResponse::Ok().json(item_response(message, Some("post"), &toggled.post)?))
}

/// POST /api/v1/post/{post_id}/comment
async fn comment_on_post(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let req = req.into_inner();
    let text = req
        .text
        .as_deref()
        .map(sanitize_input)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Comment text required"))?;

    let post_id = path.into_inner();
    let post = state
        .postgres
        .get_post(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    let commentor_name = req
        .commentor_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());
    let commentor_type = req
        .commentor_type
        .unwrap_or_else(|| ParticipantType::from_role(user.role));

    state
        .postgres
        .add_comment(
            post.id,
            user.id,
            &commentor_name,
            req.commentor_photo.as_deref(),
            commentor_type,
            &text,
        )
        .await?;

    notify_author(&state, &post, &user, req.commentor_name, NotificationType::Comment, "commented on").await;

    let post = state
        .postgres
        .get_post(post.id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    Ok(HttpResponse::Created().json(item_response("Comment added successfully", Some("post"), &post)?))
}

/// GET /api/v1/post/{post_id}/comments
async fn comments(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post = state
        .postgres
        .get_post(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    Ok(HttpResponse::Ok().json(list_response("comments", &post.comments)?))
}
