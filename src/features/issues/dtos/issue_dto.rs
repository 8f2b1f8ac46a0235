use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::issues::models::{
    CreateIssue, Issue, IssueCategory, IssueChanges, IssueFilter, IssueStatus,
};
use crate::modules::storage::resolve_url;
use crate::shared::constants::{DEFAULT_ISSUE_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::{clamp_limit, clamp_skip};

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Text fields of the issue creation form, validated after multipart parsing
#[derive(Debug, Clone, Validate)]
pub struct CreateIssueDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub category: IssueCategory,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
}

impl CreateIssueDto {
    pub fn into_create(self, reporter_id: i64) -> CreateIssue {
        CreateIssue {
            title: self.title,
            description: self.description,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            reporter_id,
        }
    }
}

/// Issue creation form (multipart/form-data)
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateIssueFormDto {
    #[schema(example = "Broken streetlight on 5th Avenue")]
    pub title: String,
    pub description: String,
    #[schema(example = "infrastructure")]
    pub category: IssueCategory,
    #[schema(example = 12.9)]
    pub latitude: f64,
    #[schema(example = 77.6)]
    pub longitude: f64,
    /// Optional photo (jpg, jpeg, png or gif, at most 5MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Partial update of an issue. Absent or null fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateIssueDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    pub category: Option<IssueCategory>,

    /// Admin only
    pub status: Option<IssueStatus>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: Option<f64>,
}

impl From<UpdateIssueDto> for IssueChanges {
    fn from(dto: UpdateIssueDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            category: dto.category,
            status: dto.status,
            latitude: dto.latitude,
            longitude: dto.longitude,
        }
    }
}

/// Query params for listing issues
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueQueryParams {
    /// Number of issues to skip (default 0)
    #[param(minimum = 0)]
    pub skip: Option<i64>,
    /// Maximum number of issues to return (default 100)
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<i64>,
    /// Filter by category
    pub category: Option<IssueCategory>,
    /// Filter by status
    pub status: Option<IssueStatus>,
}

impl From<IssueQueryParams> for IssueFilter {
    fn from(params: IssueQueryParams) -> Self {
        Self {
            category: params.category,
            status: params.status,
            offset: clamp_skip(params.skip),
            limit: clamp_limit(params.limit, DEFAULT_ISSUE_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SetStatusQuery {
    /// Target status
    pub new_status: IssueStatus,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueResponseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub status: IssueStatus,
    pub latitude: f64,
    pub longitude: f64,
    /// Absolute or root-relative URL of the photo
    pub image_url: Option<String>,
    pub reporter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssueResponseDto {
    /// Map a stored issue, turning its relative image path into a fetchable URL
    pub fn from_issue(issue: Issue, base_url: Option<&str>) -> Self {
        let image_url = issue
            .image_url
            .as_deref()
            .and_then(|path| resolve_url(path, base_url));

        Self {
            id: issue.id,
            title: issue.title,
            description: issue.description,
            category: issue.category,
            status: issue.status,
            latitude: issue.latitude,
            longitude: issue.longitude,
            image_url,
            reporter_id: issue.reporter_id,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
        }
    }
}
