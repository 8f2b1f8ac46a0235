use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::notifications::handlers;
use crate::features::notifications::services::NotificationService;

/// Create routes for the caller's notification inbox (require authentication)
pub fn routes(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/unread/count",
            get(handlers::get_unread_count),
        )
        .route(
            "/api/notifications/read-all",
            put(handlers::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/{id}/read",
            put(handlers::mark_notification_read),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::dtos::{
        MarkAllReadDto, NotificationResponseDto, UnreadCountDto,
    };
    use crate::features::users::UserRole;
    use crate::shared::test_helpers::{authenticated, with_user, MemoryDatabase};
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    struct Harness {
        db: Arc<MemoryDatabase>,
        service: Arc<NotificationService>,
        user_id: i64,
        other_id: i64,
    }

    fn harness() -> Harness {
        let db = Arc::new(MemoryDatabase::new());
        let user = db.add_user("Rita", UserRole::User);
        let other = db.add_user("Omar", UserRole::User);
        Harness {
            service: Arc::new(NotificationService::new(db.clone())),
            db,
            user_id: user.id,
            other_id: other.id,
        }
    }

    fn server_as(h: &Harness, user_id: i64) -> TestServer {
        let app = with_user(
            routes(h.service.clone()),
            authenticated(user_id, UserRole::User),
        );
        TestServer::new(app).unwrap()
    }

    async fn seed(h: &Harness, user_id: i64, count: usize) {
        for i in 0..count {
            h.service
                .notify(user_id, format!("title {}", i), "message".into(), None)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_returns_only_callers_notifications() {
        let h = harness();
        seed(&h, h.user_id, 3).await;
        seed(&h, h.other_id, 2).await;

        let response = server_as(&h, h.user_id).get("/api/notifications").await;

        response.assert_status_ok();
        let body: ApiResponse<Vec<NotificationResponseDto>> = response.json();
        let items = body.data.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|n| n.user_id == h.user_id));
        assert_eq!(items[0].title, "title 2");
    }

    #[tokio::test]
    async fn test_list_respects_window_and_unread_filter() {
        let h = harness();
        seed(&h, h.user_id, 4).await;
        let first = h.db.notifications_for(h.user_id)[0].id;
        h.service.mark_as_read(first, h.user_id).await.unwrap();
        let server = server_as(&h, h.user_id);

        let page: ApiResponse<Vec<NotificationResponseDto>> = server
            .get("/api/notifications")
            .add_query_param("skip", 1)
            .add_query_param("limit", 2)
            .await
            .json();
        let titles: Vec<String> = page.data.unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["title 2", "title 1"]);

        let unread: ApiResponse<Vec<NotificationResponseDto>> = server
            .get("/api/notifications")
            .add_query_param("unread_only", true)
            .await
            .json();
        let unread = unread.data.unwrap();
        assert_eq!(unread.len(), 3);
        assert!(unread.iter().all(|n| !n.is_read));
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let h = harness();

        let response = server_as(&h, h.user_id)
            .get("/api/notifications")
            .add_query_param("limit", "many")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_unread_count() {
        let h = harness();
        seed(&h, h.user_id, 2).await;

        let body: ApiResponse<UnreadCountDto> = server_as(&h, h.user_id)
            .get("/api/notifications/unread/count")
            .await
            .json();

        assert_eq!(body.data.unwrap().unread_count, 2);
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification_is_not_found() {
        let h = harness();
        seed(&h, h.other_id, 1).await;
        let foreign = h.db.notifications_for(h.other_id)[0].id;

        let response = server_as(&h, h.user_id)
            .put(&format!("/api/notifications/{}/read", foreign))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(!h.db.notifications_for(h.other_id)[0].is_read);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let h = harness();
        seed(&h, h.user_id, 1).await;
        let id = h.db.notifications_for(h.user_id)[0].id;

        let response = server_as(&h, h.user_id)
            .put(&format!("/api/notifications/{}/read", id))
            .await;

        response.assert_status_ok();
        let body: ApiResponse<NotificationResponseDto> = response.json();
        assert!(body.data.unwrap().is_read);
    }

    #[tokio::test]
    async fn test_mark_all_read_reports_count() {
        let h = harness();
        seed(&h, h.user_id, 3).await;
        seed(&h, h.other_id, 1).await;

        let response = server_as(&h, h.user_id)
            .put("/api/notifications/read-all")
            .await;

        response.assert_status_ok();
        let body: ApiResponse<MarkAllReadDto> = response.json();
        assert_eq!(body.data.unwrap().updated, 3);
        assert_eq!(
            body.message.as_deref(),
            Some("Marked 3 notifications as read")
        );
        assert!(!h.db.notifications_for(h.other_id)[0].is_read);
    }
}
