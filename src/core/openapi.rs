use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::images::handlers as images_handlers;
use crate::features::issues::{
    dtos as issues_dtos, handlers as issues_handlers, models as issues_models,
};
use crate::features::notifications::{
    dtos as notifications_dtos, handlers as notifications_handlers,
};
use crate::features::users::UserRole;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::get_me,
        // Issues
        issues_handlers::create_issue,
        issues_handlers::list_issues,
        issues_handlers::get_issue,
        issues_handlers::update_issue,
        issues_handlers::set_issue_status,
        issues_handlers::delete_issue,
        // Images (public)
        images_handlers::get_image,
        // Notifications
        notifications_handlers::list_notifications,
        notifications_handlers::get_unread_count,
        notifications_handlers::mark_notification_read,
        notifications_handlers::mark_all_notifications_read,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            UserRole,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::model::AuthenticatedUser>,
            // Issues
            issues_models::IssueCategory,
            issues_models::IssueStatus,
            issues_dtos::CreateIssueFormDto,
            issues_dtos::UpdateIssueDto,
            issues_dtos::IssueResponseDto,
            ApiResponse<issues_dtos::IssueResponseDto>,
            ApiResponse<Vec<issues_dtos::IssueResponseDto>>,
            // Notifications
            notifications_dtos::NotificationResponseDto,
            notifications_dtos::UnreadCountDto,
            notifications_dtos::MarkAllReadDto,
            ApiResponse<notifications_dtos::NotificationResponseDto>,
            ApiResponse<Vec<notifications_dtos::NotificationResponseDto>>,
            ApiResponse<notifications_dtos::UnreadCountDto>,
            ApiResponse<notifications_dtos::MarkAllReadDto>,
        )
    ),
    tags(
        (name = "auth", description = "Authenticated caller"),
        (name = "issues", description = "Community issue reports"),
        (name = "images", description = "Stored issue photos (public)"),
        (name = "notifications", description = "Issue status notifications of the caller"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Issues API",
        version = "0.1.0",
        description = "API documentation for the community issue reporting service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Test API".to_string(),
            version: "9.9.9".to_string(),
            description: "test".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Test API");
        for path in [
            "/api/auth/me",
            "/api/issues",
            "/api/issues/{id}",
            "/api/issues/{id}/status",
            "/api/images/{path}",
            "/api/notifications",
            "/api/notifications/unread/count",
            "/api/notifications/{id}/read",
            "/api/notifications/read-all",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
