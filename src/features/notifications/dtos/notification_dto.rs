use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::notifications::models::Notification;
use crate::shared::constants::{DEFAULT_NOTIFICATION_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::{clamp_limit, clamp_skip};

/// Query params for listing the caller's notifications
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQueryParams {
    /// Number of notifications to skip (default 0)
    #[param(minimum = 0)]
    pub skip: Option<i64>,
    /// Maximum number of notifications to return (default 50)
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

impl NotificationQueryParams {
    pub fn offset(&self) -> i64 {
        clamp_skip(self.skip)
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_NOTIFICATION_PAGE_SIZE, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponseDto {
    pub id: i64,
    pub user_id: i64,
    pub issue_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponseDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            issue_id: n.issue_id,
            title: n.title,
            message: n.message,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnreadCountDto {
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadDto {
    /// Number of notifications that changed from unread to read
    pub updated: u64,
}
