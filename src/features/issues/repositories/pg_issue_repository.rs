use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::issues::models::{CreateIssue, Issue, IssueChanges, IssueFilter};
use crate::features::issues::repositories::IssueRepository;

const ISSUE_COLUMNS: &str = r#"
    id, title, description, category, status,
    latitude, longitude, image_url, reporter_id,
    created_at, updated_at
"#;

/// Postgres-backed issue persistence
pub struct PgIssueRepository {
    pool: PgPool,
}

impl PgIssueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueRepository for PgIssueRepository {
    async fn insert(&self, data: &CreateIssue) -> Result<Issue> {
        let sql = format!(
            r#"
            INSERT INTO issues (title, description, category, latitude, longitude, reporter_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ISSUE_COLUMNS
        );

        sqlx::query_as::<_, Issue>(&sql)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(data.reporter_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert issue: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Issue>> {
        let sql = format!("SELECT {} FROM issues WHERE id = $1", ISSUE_COLUMNS);

        sqlx::query_as::<_, Issue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch issue {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn list(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM issues
            WHERE ($1::issue_category IS NULL OR category = $1)
              AND ($2::issue_status IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#,
            ISSUE_COLUMNS
        );

        sqlx::query_as::<_, Issue>(&sql)
            .bind(filter.category)
            .bind(filter.status)
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issues: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn count(&self, filter: &IssueFilter) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM issues
            WHERE ($1::issue_category IS NULL OR category = $1)
              AND ($2::issue_status IS NULL OR status = $2)
            "#,
        )
        .bind(filter.category)
        .bind(filter.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count issues: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update(&self, id: i64, changes: &IssueChanges) -> Result<Option<Issue>> {
        let sql = format!(
            r#"
            UPDATE issues
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                status = COALESCE($5, status),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ISSUE_COLUMNS
        );

        sqlx::query_as::<_, Issue>(&sql)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.category)
            .bind(changes.status)
            .bind(changes.latitude)
            .bind(changes.longitude)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update issue {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn set_image_url(&self, id: i64, image_url: &str) -> Result<Option<Issue>> {
        let sql = format!(
            r#"
            UPDATE issues
            SET image_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ISSUE_COLUMNS
        );

        sqlx::query_as::<_, Issue>(&sql)
            .bind(id)
            .bind(image_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to set image for issue {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM notifications WHERE issue_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete notifications of issue {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        let deleted = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete issue {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}
