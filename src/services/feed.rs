use uuid::Uuid;

use crate::models::{
    Comment, NewNotification, NewPost, Notification, ParticipantType, Post, PostType,
    UpdatePostRequest,
};
use crate::services::postgres::{like_pattern, PostgresClient, PostgresError};

/// Upper bound on the explore feed
pub const EXPLORE_LIMIT: i64 = 50;

/// Filters for listing live (not deleted) posts
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category: Option<String>,
    pub post_type: Option<PostType>,
    /// Case-insensitive substring of the title, content or any tag
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// A toggled membership (like or save) and the post after the change
#[derive(Debug, Clone)]
pub struct Toggled {
    pub post: Post,
    pub active: bool,
}

impl PostgresClient {
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, PostgresError> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, author_type, author_name, author_photo, author_company,
                               title, description, content, image, post_type, tags, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post.author_id)
        .bind(post.author_type)
        .bind(&post.author_name)
        .bind(post.author_photo.as_deref())
        .bind(post.author_company.as_deref())
        .bind(&post.title)
        .bind(post.description.as_deref())
        .bind(&post.content)
        .bind(post.image.as_deref())
        .bind(post.post_type)
        .bind(&post.tags)
        .bind(&post.category)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created post {} by {}", created.id, created.author_id);

        Ok(created)
    }

    /// Live posts matching `filter`, newest first
    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, PostgresError> {
        let query = r#"
            SELECT * FROM posts
            WHERE is_deleted = FALSE
              AND ($1::uuid IS NULL OR author_id = $1)
              AND ($2::text IS NULL OR category = $2)
              AND ($3::post_type IS NULL OR post_type = $3)
              AND ($4::text IS NULL
                   OR title ILIKE $4
                   OR content ILIKE $4
                   OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $4))
            ORDER BY created_at DESC
            LIMIT $5
        "#;

        let posts = sqlx::query_as::<_, Post>(query)
            .bind(filter.author_id)
            .bind(filter.category.as_deref())
            .bind(filter.post_type)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// A live post with its comments
    pub async fn get_post(&self, id: Uuid) -> Result<Option<Post>, PostgresError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.with_comments(post).await
    }

    /// Like `get_post`, counting the read as a view
    pub async fn view_post(&self, id: Uuid) -> Result<Option<Post>, PostgresError> {
        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts SET views = views + 1 WHERE id = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_comments(post).await
    }

    /// Apply the present fields of `update` and mark the post edited
    pub async fn update_post(
        &self,
        id: Uuid,
        update: &UpdatePostRequest,
    ) -> Result<Option<Post>, PostgresError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                content = COALESCE($4, content),
                image = COALESCE($5, image),
                post_type = COALESCE($6, post_type),
                tags = COALESCE($7, tags),
                category = COALESCE($8, category),
                is_edited = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.title.as_deref())
        .bind(update.description.as_deref())
        .bind(update.content.as_deref())
        .bind(update.image.as_deref())
        .bind(update.post_type)
        .bind(update.tags.as_deref())
        .bind(update.category.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        self.with_comments(post).await
    }

    /// Soft delete; returns false when the post is missing or already deleted
    pub async fn soft_delete_post(&self, id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "UPDATE posts SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add or remove `user_id` from the post's likes
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Toggled>, PostgresError> {
        self.toggle_member("likes", post_id, user_id).await
    }

    /// Add or remove `user_id` from the post's saves
    pub async fn toggle_save(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Toggled>, PostgresError> {
        self.toggle_member("saves", post_id, user_id).await
    }

    async fn toggle_member(
        &self,
        column: &'static str,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Toggled>, PostgresError> {
        let query = format!(
            r#"
            UPDATE posts SET
                {column} = CASE
                    WHEN $2 = ANY({column}) THEN array_remove({column}, $2)
                    ELSE array_append({column}, $2)
                END,
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING *
            "#,
            column = column
        );

        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let post = self.with_comments(post).await?;

        Ok(post.map(|post| {
            let active = match column {
                "likes" => post.is_liked_by(user_id),
                _ => post.is_saved_by(user_id),
            };
            Toggled { post, active }
        }))
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        commentor_id: Uuid,
        commentor_name: &str,
        commentor_photo: Option<&str>,
        commentor_type: ParticipantType,
        text: &str,
    ) -> Result<Comment, PostgresError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO post_comments (id, post_id, commentor_id, commentor_name, commentor_photo, commentor_type, text)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(commentor_id)
        .bind(commentor_name)
        .bind(commentor_photo)
        .bind(commentor_type)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments on a post, oldest first
    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, PostgresError> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM post_comments WHERE post_id = $1 ORDER BY created_at ASC, id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn with_comments(&self, post: Option<Post>) -> Result<Option<Post>, PostgresError> {
        match post {
            Some(mut post) => {
                post.comments = self.comments_for_post(post.id).await?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    // ---- notifications ----

    pub async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, PostgresError> {
        let created = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, recipient_id, sender_id, sender_name, notification_type,
                                       post_id, connection_id, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.recipient_id)
        .bind(notification.sender_id)
        .bind(&notification.sender_name)
        .bind(notification.notification_type)
        .bind(notification.post_id)
        .bind(notification.connection_id)
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Notified {} ({:?})",
            created.recipient_id,
            created.notification_type
        );

        Ok(created)
    }

    /// Notifications for a user, newest first
    pub async fn notifications_for(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
    ) -> Result<Vec<Notification>, PostgresError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE recipient_id = $1 AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn get_notification(&self, id: Uuid) -> Result<Option<Notification>, PostgresError> {
        let notification = sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(notification)
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Option<Notification>, PostgresError> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn delete_notification(&self, id: Uuid) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
