//! Notification Emitter and the caller's notification inbox.
//!
//! Notifications are written when an admin moves an issue to a different
//! status and are addressed to the issue's reporter.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/notifications` | Yes | List own notifications |
//! | GET | `/api/notifications/unread/count` | Yes | Count unread |
//! | PUT | `/api/notifications/{id}/read` | Yes | Mark one as read |
//! | PUT | `/api/notifications/read-all` | Yes | Mark all as read |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgNotificationRepository;
pub use services::NotificationService;
