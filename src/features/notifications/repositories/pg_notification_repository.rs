use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::notifications::models::{CreateNotification, Notification};
use crate::features::notifications::repositories::NotificationRepository;

/// Postgres-backed notification persistence
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(&self, data: &CreateNotification) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, issue_id, title, message, is_read)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING id, user_id, issue_id, title, message, is_read, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.issue_id)
        .bind(&data.title)
        .bind(&data.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert notification: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, issue_id, title, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
              AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list notifications for user {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count unread notifications: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn mark_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, issue_id, title, message, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification {} as read: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark all notifications as read: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected())
    }
}
