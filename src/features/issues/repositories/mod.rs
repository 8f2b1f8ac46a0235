mod pg_issue_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::issues::models::{CreateIssue, Issue, IssueChanges, IssueFilter};

pub use pg_issue_repository::PgIssueRepository;

/// Persistence for issue records
#[async_trait]
pub trait IssueRepository: Send + Sync {
    async fn insert(&self, data: &CreateIssue) -> Result<Issue>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Issue>>;

    /// Newest first; ties on `created_at` are broken by id, newest first
    async fn list(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// Number of issues matching the filter's category/status, ignoring the window
    async fn count(&self, filter: &IssueFilter) -> Result<i64>;

    /// Apply the non-`None` fields and bump `updated_at`
    async fn update(&self, id: i64, changes: &IssueChanges) -> Result<Option<Issue>>;

    async fn set_image_url(&self, id: i64, image_url: &str) -> Result<Option<Issue>>;

    /// Delete the issue together with its notifications. Returns false if absent.
    async fn delete(&self, id: i64) -> Result<bool>;
}
