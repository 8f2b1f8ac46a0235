use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

/// Issue category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Infrastructure,
    Safety,
    Environment,
    Health,
    Other,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Infrastructure => write!(f, "infrastructure"),
            IssueCategory::Safety => write!(f, "safety"),
            IssueCategory::Environment => write!(f, "environment"),
            IssueCategory::Health => write!(f, "health"),
            IssueCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for IssueCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "infrastructure" => Ok(IssueCategory::Infrastructure),
            "safety" => Ok(IssueCategory::Safety),
            "environment" => Ok(IssueCategory::Environment),
            "health" => Ok(IssueCategory::Health),
            "other" => Ok(IssueCategory::Other),
            other => Err(format!(
                "Invalid category '{}'. Allowed: infrastructure, safety, environment, health, other",
                other
            )),
        }
    }
}

/// Issue status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "issue_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Pending => write!(f, "pending"),
            IssueStatus::InProgress => write!(f, "in_progress"),
            IssueStatus::Resolved => write!(f, "resolved"),
            IssueStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Database model for issue
#[derive(Debug, Clone, FromRow)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub status: IssueStatus,
    pub latitude: f64,
    pub longitude: f64,
    /// Path relative to the upload root, e.g. `issues/5/{uuid}.png`
    pub image_url: Option<String>,
    pub reporter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data for creating a new issue
#[derive(Debug, Clone)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub latitude: f64,
    pub longitude: f64,
    pub reporter_id: i64,
}

/// Partial update of an issue. `None` leaves the column untouched.
///
/// There is deliberately no `reporter_id` field.
#[derive(Debug, Clone, Default)]
pub struct IssueChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<IssueCategory>,
    pub status: Option<IssueStatus>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl IssueChanges {
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// Filter and window for listing issues
#[derive(Debug, Clone)]
pub struct IssueFilter {
    pub category: Option<IssueCategory>,
    pub status: Option<IssueStatus>,
    pub offset: i64,
    pub limit: i64,
}
