pub mod auth;
pub mod images;
pub mod issues;
pub mod notifications;
pub mod users;
