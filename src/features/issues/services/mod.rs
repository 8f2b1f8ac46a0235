mod issue_service;

pub use issue_service::{ImageUpload, IssueService};
