use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::models::{CreateIssue, Issue, IssueChanges, IssueFilter, IssueStatus};
use crate::features::issues::policy;
use crate::features::issues::repositories::IssueRepository;
use crate::features::notifications::NotificationService;
use crate::modules::storage::{ImageStore, StorageError};

/// Photo attached to an issue creation request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Service for issue lifecycle management
pub struct IssueService {
    issues: Arc<dyn IssueRepository>,
    notifications: Arc<NotificationService>,
    images: Arc<ImageStore>,
}

impl IssueService {
    pub fn new(
        issues: Arc<dyn IssueRepository>,
        notifications: Arc<NotificationService>,
        images: Arc<ImageStore>,
    ) -> Self {
        Self {
            issues,
            notifications,
            images,
        }
    }

    /// Largest photo accepted by [`IssueService::create`], in bytes
    pub fn max_image_size(&self) -> usize {
        self.images.max_file_size()
    }

    /// Create an issue, then attach its photo.
    ///
    /// The record needs an id before the photo can be stored under it. If the
    /// photo cannot be attached the record is deleted again.
    pub async fn create(&self, data: CreateIssue, image: Option<ImageUpload>) -> Result<Issue> {
        let issue = self.issues.insert(&data).await?;
        info!(
            "Issue created: id={}, reporter_id={}, category={}",
            issue.id, issue.reporter_id, issue.category
        );

        let Some(upload) = image else {
            return Ok(issue);
        };

        let stored = match self
            .images
            .save(
                upload.data,
                &upload.filename,
                &upload.content_type,
                issue.id,
            )
            .await
        {
            Ok(path) => path,
            Err(StorageError::Io(e)) => {
                error!("Failed to write image for issue {}: {}", issue.id, e);
                self.discard(issue.id, None).await;
                return Err(AppError::Internal(format!(
                    "Failed to write image for issue {}: {}",
                    issue.id, e
                )));
            }
            Err(e) => {
                warn!("Image rejected for issue {}: {}", issue.id, e);
                self.discard(issue.id, None).await;
                return Err(AppError::Validation(format!(
                    "Error uploading image: {}",
                    e
                )));
            }
        };

        match self.issues.set_image_url(issue.id, &stored).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => {
                self.discard(issue.id, Some(&stored)).await;
                Err(AppError::Internal(format!(
                    "Issue {} disappeared while attaching its image",
                    issue.id
                )))
            }
            Err(e) => {
                self.discard(issue.id, Some(&stored)).await;
                Err(e)
            }
        }
    }

    /// Undo a half-finished create
    async fn discard(&self, issue_id: i64, stored_image: Option<&str>) {
        if let Some(path) = stored_image {
            if let Err(e) = self.images.delete(path).await {
                warn!("Failed to remove image {} of discarded issue: {}", path, e);
            }
        }

        match self.issues.delete(issue_id).await {
            Ok(_) => debug!("Discarded issue {} after failed image upload", issue_id),
            Err(e) => error!("Failed to discard issue {}: {}", issue_id, e),
        }
    }

    /// Page of issues plus the total matching the filter
    pub async fn list(&self, filter: IssueFilter) -> Result<(Vec<Issue>, i64)> {
        let issues = self.issues.list(&filter).await?;
        let total = self.issues.count(&filter).await?;
        Ok((issues, total))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Issue> {
        self.issues
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Apply a partial update on behalf of `requester`.
    ///
    /// Non-admins may not touch `status` and may only edit their own issues.
    pub async fn update(
        &self,
        id: i64,
        requester: &AuthenticatedUser,
        changes: IssueChanges,
    ) -> Result<Issue> {
        let current = self.get_by_id(id).await?;

        if changes.status.is_some() && !policy::can_set_status(requester) {
            return Err(AppError::Forbidden(
                "Only admins can update issue status".to_string(),
            ));
        }

        if !policy::can_mutate(requester, &current) {
            return Err(AppError::Forbidden(
                "You can only update your own issues".to_string(),
            ));
        }

        if changes.is_empty() {
            debug!("Empty update for issue {}, nothing to write", id);
            return Ok(current);
        }

        let updated = self
            .issues
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!("Issue updated: id={}, by user {}", id, requester.id);

        self.announce_status_change(&updated, current.status).await;

        Ok(updated)
    }

    /// Admin-only status change. Always writes; notifies only on a real change.
    pub async fn set_status(
        &self,
        id: i64,
        new_status: IssueStatus,
        admin: &AuthenticatedUser,
    ) -> Result<Issue> {
        if !policy::can_set_status(admin) {
            return Err(AppError::Forbidden(
                "Only admins can update issue status".to_string(),
            ));
        }

        let current = self.get_by_id(id).await?;

        let updated = self
            .issues
            .update(id, &IssueChanges::status(new_status))
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(
            "Issue status set: id={}, {} -> {}, by admin {}",
            id, current.status, new_status, admin.id
        );

        self.announce_status_change(&updated, current.status).await;

        Ok(updated)
    }

    /// The update is already committed, so a failed notification is only logged
    async fn announce_status_change(&self, issue: &Issue, old_status: IssueStatus) {
        if let Err(e) = self
            .notifications
            .notify_status_change(issue, old_status, issue.status)
            .await
        {
            error!(
                "Failed to notify reporter {} about issue {}: {}",
                issue.reporter_id, issue.id, e
            );
        }
    }

    /// Admin-only delete of the photo, the issue and its notifications
    pub async fn delete(&self, id: i64, admin: &AuthenticatedUser) -> Result<()> {
        if !policy::can_delete(admin) {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        let issue = self.get_by_id(id).await?;

        if let Some(path) = issue.image_url.as_deref() {
            if let Err(e) = self.images.delete(path).await {
                warn!("Failed to delete image {} of issue {}: {}", path, id, e);
            }
        }

        if !self.issues.delete(id).await? {
            return Err(not_found(id));
        }
        info!("Issue deleted: id={}, by admin {}", id, admin.id);

        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Issue with id {} not found", id))
}
