//! Public read access to stored issue photos.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/images/{*path}` | No | Serve a stored photo |

pub mod handlers;
pub mod routes;
