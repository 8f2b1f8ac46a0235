//! Users of the reporting platform.
//!
//! Accounts are registered by the external identity service; this feature
//! only reads them to resolve the caller of an authenticated request.

pub mod models;
pub mod repositories;

pub use models::{User, UserRole};
pub use repositories::{PgUserRepository, UserRepository};
