use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::notifications::dtos::{
    MarkAllReadDto, NotificationQueryParams, NotificationResponseDto, UnreadCountDto,
};
use crate::features::notifications::services::NotificationService;
use crate::shared::types::ApiResponse;

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQueryParams),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = ApiResponse<Vec<NotificationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
    user: AuthenticatedUser,
    AppQuery(params): AppQuery<NotificationQueryParams>,
) -> Result<Json<ApiResponse<Vec<NotificationResponseDto>>>> {
    let notifications = service
        .list_for_user(user.id, params.unread_only, params.offset(), params.limit())
        .await?
        .into_iter()
        .map(NotificationResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(Some(notifications), None, None)))
}

/// Count the caller's unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/unread/count",
    responses(
        (status = 200, description = "Unread count retrieved successfully", body = ApiResponse<UnreadCountDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_unread_count(
    State(service): State<Arc<NotificationService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<UnreadCountDto>>> {
    let unread_count = service.unread_count(user.id).await?;

    Ok(Json(ApiResponse::success(
        Some(UnreadCountDto { unread_count }),
        None,
        None,
    )))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = ApiResponse<NotificationResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found or owned by another user")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_notification_read(
    State(service): State<Arc<NotificationService>>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<NotificationResponseDto>>> {
    let notification = service.mark_as_read(id, user.id).await?;

    Ok(Json(ApiResponse::success(
        Some(notification.into()),
        None,
        None,
    )))
}

/// Mark all of the caller's notifications as read
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "Notifications marked as read", body = ApiResponse<MarkAllReadDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mark_all_notifications_read(
    State(service): State<Arc<NotificationService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<MarkAllReadDto>>> {
    let updated = service.mark_all_as_read(user.id).await?;

    Ok(Json(ApiResponse::success(
        Some(MarkAllReadDto { updated }),
        Some(format!("Marked {} notifications as read", updated)),
        None,
    )))
}
