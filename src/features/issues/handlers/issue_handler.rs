use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery, RequestBaseUrl};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::dtos::{
    CreateIssueDto, CreateIssueFormDto, IssueQueryParams, IssueResponseDto, SetStatusQuery,
    UpdateIssueDto,
};
use crate::features::issues::models::IssueCategory;
use crate::features::issues::routes::IssueState;
use crate::features::issues::services::ImageUpload;
use crate::modules::storage::StorageError;
use crate::shared::types::{ApiResponse, Meta};

/// Base URL used to turn stored image paths into links
fn image_base<'a>(state: &'a IssueState, request_base: &'a Option<String>) -> Option<&'a str> {
    state
        .public_base_url
        .as_deref()
        .or(request_base.as_deref())
}

/// Report a new issue
///
/// Accepts multipart/form-data with:
/// - `title`, `description`, `category`, `latitude`, `longitude` (required)
/// - `image`: optional photo (jpg, jpeg, png or gif)
#[utoipa::path(
    post,
    path = "/api/issues",
    tag = "issues",
    request_body(
        content = CreateIssueFormDto,
        content_type = "multipart/form-data",
        description = "Issue fields plus an optional photo",
    ),
    responses(
        (status = 201, description = "Issue created successfully", body = ApiResponse<IssueResponseDto>),
        (status = 400, description = "Invalid fields or image"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "Request body too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_issue(
    user: AuthenticatedUser,
    State(state): State<IssueState>,
    RequestBaseUrl(request_base): RequestBaseUrl,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<IssueResponseDto>>)> {
    let max_image_size = state.service.max_image_size();

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut category: Option<String> = None;
    let mut latitude: Option<String> = None;
    let mut longitude: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            too_large(max_image_size)
        } else {
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        }
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "title" => title = Some(read_text(field, "title").await?),
            "description" => description = Some(read_text(field, "description").await?),
            "category" => category = Some(read_text(field, "category").await?),
            "latitude" => latitude = Some(read_text(field, "latitude").await?),
            "longitude" => longitude = Some(read_text(field, "longitude").await?),
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        too_large(max_image_size)
                    } else {
                        AppError::BadRequest(format!("Failed to read image data: {}", e))
                    }
                })?;

                // Browsers send an empty part when no file was picked
                if filename.is_empty() && data.is_empty() {
                    continue;
                }

                image = Some(ImageUpload {
                    data: data.to_vec(),
                    filename,
                    content_type,
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let dto = CreateIssueDto {
        title: required(title, "title")?,
        description: required(description, "description")?,
        category: required(category, "category")?
            .parse::<IssueCategory>()
            .map_err(AppError::Validation)?,
        latitude: parse_coordinate(required(latitude, "latitude")?, "latitude")?,
        longitude: parse_coordinate(required(longitude, "longitude")?, "longitude")?,
    };
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let issue = state
        .service
        .create(dto.into_create(user.id), image)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(IssueResponseDto::from_issue(
                issue,
                image_base(&state, &request_base),
            )),
            Some("Issue created successfully".to_string()),
            None,
        )),
    ))
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| AppError::Validation(format!("Field '{}' is required", name)))
}

fn parse_coordinate(raw: String, name: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("Field '{}' must be a number", name)))
}

fn too_large(max_image_size: usize) -> AppError {
    let megabytes = max_image_size as f64 / 1024.0 / 1024.0;
    AppError::Validation(StorageError::TooLarge(megabytes).to_string())
}

/// List issues, newest first
#[utoipa::path(
    get,
    path = "/api/issues",
    params(IssueQueryParams),
    responses(
        (status = 200, description = "Issues retrieved successfully", body = ApiResponse<Vec<IssueResponseDto>>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "issues"
)]
pub async fn list_issues(
    State(state): State<IssueState>,
    RequestBaseUrl(request_base): RequestBaseUrl,
    AppQuery(params): AppQuery<IssueQueryParams>,
) -> Result<Json<ApiResponse<Vec<IssueResponseDto>>>> {
    let (issues, total) = state.service.list(params.into()).await?;

    let base = image_base(&state, &request_base);
    let items = issues
        .into_iter()
        .map(|issue| IssueResponseDto::from_issue(issue, base))
        .collect();

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get a single issue
#[utoipa::path(
    get,
    path = "/api/issues/{id}",
    params(
        ("id" = i64, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue retrieved successfully", body = ApiResponse<IssueResponseDto>),
        (status = 404, description = "Issue not found")
    ),
    tag = "issues"
)]
pub async fn get_issue(
    State(state): State<IssueState>,
    RequestBaseUrl(request_base): RequestBaseUrl,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<IssueResponseDto>>> {
    let issue = state.service.get_by_id(id).await?;

    Ok(Json(ApiResponse::success(
        Some(IssueResponseDto::from_issue(
            issue,
            image_base(&state, &request_base),
        )),
        None,
        None,
    )))
}

/// Update an issue
///
/// Owners may edit their own issues. Only admins may change `status`.
#[utoipa::path(
    patch,
    path = "/api/issues/{id}",
    params(
        ("id" = i64, Path, description = "Issue ID")
    ),
    request_body = UpdateIssueDto,
    responses(
        (status = 200, description = "Issue updated successfully", body = ApiResponse<IssueResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner, or non-admin changing status"),
        (status = 404, description = "Issue not found")
    ),
    tag = "issues",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_issue(
    user: AuthenticatedUser,
    State(state): State<IssueState>,
    RequestBaseUrl(request_base): RequestBaseUrl,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateIssueDto>,
) -> Result<Json<ApiResponse<IssueResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let issue = state.service.update(id, &user, dto.into()).await?;

    Ok(Json(ApiResponse::success(
        Some(IssueResponseDto::from_issue(
            issue,
            image_base(&state, &request_base),
        )),
        Some("Issue updated successfully".to_string()),
        None,
    )))
}

/// Set the status of an issue (admin only)
#[utoipa::path(
    put,
    path = "/api/issues/{id}/status",
    params(
        ("id" = i64, Path, description = "Issue ID"),
        SetStatusQuery
    ),
    responses(
        (status = 200, description = "Issue status updated", body = ApiResponse<IssueResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Issue not found")
    ),
    tag = "issues",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_issue_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<IssueState>,
    RequestBaseUrl(request_base): RequestBaseUrl,
    Path(id): Path<i64>,
    AppQuery(query): AppQuery<SetStatusQuery>,
) -> Result<Json<ApiResponse<IssueResponseDto>>> {
    let issue = state
        .service
        .set_status(id, query.new_status, &admin)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(IssueResponseDto::from_issue(
            issue,
            image_base(&state, &request_base),
        )),
        Some(format!("Issue status updated to {}", query.new_status)),
        None,
    )))
}

/// Delete an issue, its photo and its notifications (admin only)
#[utoipa::path(
    delete,
    path = "/api/issues/{id}",
    params(
        ("id" = i64, Path, description = "Issue ID")
    ),
    responses(
        (status = 204, description = "Issue deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Issue not found")
    ),
    tag = "issues",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_issue(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<IssueState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.service.delete(id, &admin).await?;
    Ok(StatusCode::NO_CONTENT)
}
