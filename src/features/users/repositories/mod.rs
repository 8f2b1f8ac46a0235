mod pg_user_repository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::users::models::User;

pub use pg_user_repository::PgUserRepository;

/// Read access to user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
}
