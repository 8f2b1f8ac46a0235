mod pg_notification_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::notifications::models::{CreateNotification, Notification};

pub use pg_notification_repository::PgNotificationRepository;

/// Persistence for notification records
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, data: &CreateNotification) -> Result<Notification>;

    /// Newest first
    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Notification>>;

    async fn count_unread(&self, user_id: i64) -> Result<i64>;

    /// Mark one of the user's notifications as read. `None` if it is absent or not theirs.
    async fn mark_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>>;

    /// Mark every unread notification of the user as read, returning how many changed
    async fn mark_all_read(&self, user_id: i64) -> Result<u64>;
}
