mod issue;

pub use issue::{CreateIssue, Issue, IssueCategory, IssueChanges, IssueFilter, IssueStatus};
