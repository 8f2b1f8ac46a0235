use std::sync::Arc;

use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::issues::models::{Issue, IssueStatus};
use crate::features::notifications::models::{CreateNotification, Notification};
use crate::features::notifications::repositories::NotificationRepository;
use crate::shared::constants::NOTIFICATION_TITLE_MAX_CHARS;

/// Service for creating and reading user notifications
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Create a notification for a user. No deduplication is applied.
    pub async fn notify(
        &self,
        user_id: i64,
        title: String,
        message: String,
        issue_id: Option<i64>,
    ) -> Result<Notification> {
        let notification = self
            .repository
            .insert(&CreateNotification {
                user_id,
                issue_id,
                title,
                message,
            })
            .await?;

        info!(
            "Notification created: id={}, user_id={}, issue_id={:?}",
            notification.id, notification.user_id, notification.issue_id
        );

        Ok(notification)
    }

    /// Tell the reporter that their issue moved to a new status.
    ///
    /// Returns `None` without writing anything when the status did not change.
    pub async fn notify_status_change(
        &self,
        issue: &Issue,
        old_status: IssueStatus,
        new_status: IssueStatus,
    ) -> Result<Option<Notification>> {
        if old_status == new_status {
            debug!(
                "Issue {} status unchanged ({}), no notification",
                issue.id, new_status
            );
            return Ok(None);
        }

        let notification = self
            .notify(
                issue.reporter_id,
                status_change_title(&issue.title),
                status_change_message(&issue.title, new_status),
                Some(issue.id),
            )
            .await?;

        Ok(Some(notification))
    }

    pub async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        self.repository
            .list_for_user(user_id, unread_only, offset, limit)
            .await
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        self.repository.count_unread(user_id).await
    }

    pub async fn mark_as_read(&self, id: i64, user_id: i64) -> Result<Notification> {
        self.repository
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))
    }

    pub async fn mark_all_as_read(&self, user_id: i64) -> Result<u64> {
        let updated = self.repository.mark_all_read(user_id).await?;
        info!(
            "Marked {} notifications as read for user {}",
            updated, user_id
        );
        Ok(updated)
    }
}

/// Notification title for a status change, cut to fit the `title` column
pub fn status_change_title(issue_title: &str) -> String {
    format!("Issue Status Update: {}", issue_title)
        .chars()
        .take(NOTIFICATION_TITLE_MAX_CHARS)
        .collect()
}

/// Human readable sentence for a status transition
pub fn status_change_message(title: &str, status: IssueStatus) -> String {
    let phrase = match status {
        IssueStatus::Pending => "is pending review",
        IssueStatus::InProgress => "is now in progress",
        IssueStatus::Resolved => "has been resolved",
        IssueStatus::Closed => "has been closed",
    };

    format!("Your issue '{}' {}.", title, phrase)
}
