use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notification
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    /// Set only when the notification originates from an issue status change
    pub issue_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new notification
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: i64,
    pub issue_id: Option<i64>,
    pub title: String,
    pub message: String,
}
