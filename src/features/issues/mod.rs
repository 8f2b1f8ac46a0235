//! Community issue reports.
//!
//! Citizens file issues with a location and an optional photo. Admins move
//! issues through their lifecycle; each real status change notifies the
//! reporter.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/issues` | Yes | Report an issue (multipart, optional image) |
//! | GET | `/api/issues` | No | List issues with filters and paging |
//! | GET | `/api/issues/{id}` | No | Get one issue |
//! | PATCH | `/api/issues/{id}` | Owner/Admin | Partial update |
//! | PUT | `/api/issues/{id}/status` | Admin | Set status |
//! | DELETE | `/api/issues/{id}` | Admin | Delete issue, photo and notifications |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgIssueRepository;
pub use routes::IssueState;
pub use services::IssueService;
