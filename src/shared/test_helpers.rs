//! Test-only fixtures: an in-memory database behind the repository traits,
//! authenticated callers, and real image payloads.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{Duration, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::issues::models::{
    CreateIssue, Issue, IssueCategory, IssueChanges, IssueFilter, IssueStatus,
};
use crate::features::issues::repositories::IssueRepository;
use crate::features::notifications::models::{CreateNotification, Notification};
use crate::features::notifications::repositories::NotificationRepository;
use crate::features::users::{User, UserRole, UserRepository};

// =============================================================================
// IN-MEMORY DATABASE
// =============================================================================

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    issues: Vec<Issue>,
    notifications: Vec<Notification>,
    next_user_id: i64,
    next_issue_id: i64,
    next_notification_id: i64,
}

/// Implements every repository trait over plain vectors
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
    fail_notification_inserts: AtomicBool,
    fail_image_updates: AtomicBool,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, role: UserRole) -> User {
        let mut tables = self.tables.lock().unwrap();
        tables.next_user_id += 1;
        let id = tables.next_user_id;
        let user = User {
            id,
            name: name.to_string(),
            email: format!("{}.{}@example.com", name.to_lowercase(), id),
            password_hash: "not-a-real-hash".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.users.push(user.clone());
        user
    }

    pub fn notifications_for(&self, user_id: i64) -> Vec<Notification> {
        self.tables
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.tables.lock().unwrap().notifications.len()
    }

    pub fn issue_count(&self) -> usize {
        self.tables.lock().unwrap().issues.len()
    }

    pub fn stored_issue(&self, id: i64) -> Option<Issue> {
        self.tables
            .lock()
            .unwrap()
            .issues
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Make every subsequent notification insert fail with a database-style error
    pub fn fail_notification_inserts(&self) {
        self.fail_notification_inserts.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `set_image_url` fail
    pub fn fail_image_updates(&self) {
        self.fail_image_updates.store(true, Ordering::SeqCst);
    }

    fn matches(issue: &Issue, filter: &IssueFilter) -> bool {
        filter.category.is_none_or(|c| issue.category == c)
            && filter.status.is_none_or(|s| issue.status == s)
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

#[async_trait]
impl IssueRepository for MemoryDatabase {
    async fn insert(&self, data: &CreateIssue) -> Result<Issue> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_issue_id += 1;
        let issue = Issue {
            id: tables.next_issue_id,
            title: data.title.clone(),
            description: data.description.clone(),
            category: data.category,
            status: IssueStatus::Pending,
            latitude: data.latitude,
            longitude: data.longitude,
            image_url: None,
            reporter_id: data.reporter_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.issues.push(issue.clone());
        Ok(issue)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Issue>> {
        Ok(self.stored_issue(id))
    }

    async fn list(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let tables = self.tables.lock().unwrap();
        let mut matching: Vec<Issue> = tables
            .issues
            .iter()
            .filter(|i| Self::matches(i, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &IssueFilter) -> Result<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .issues
            .iter()
            .filter(|i| Self::matches(i, filter))
            .count() as i64)
    }

    async fn update(&self, id: i64, changes: &IssueChanges) -> Result<Option<Issue>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(issue) = tables.issues.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            issue.title = title.clone();
        }
        if let Some(description) = &changes.description {
            issue.description = description.clone();
        }
        if let Some(category) = changes.category {
            issue.category = category;
        }
        if let Some(status) = changes.status {
            issue.status = status;
        }
        if let Some(latitude) = changes.latitude {
            issue.latitude = latitude;
        }
        if let Some(longitude) = changes.longitude {
            issue.longitude = longitude;
        }
        issue.updated_at = Some(Utc::now());

        Ok(Some(issue.clone()))
    }

    async fn set_image_url(&self, id: i64, image_url: &str) -> Result<Option<Issue>> {
        if self.fail_image_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("image update failed".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        let Some(issue) = tables.issues.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        issue.image_url = Some(image_url.to_string());
        issue.updated_at = Some(Utc::now());

        Ok(Some(issue.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.issues.len();
        tables.issues.retain(|i| i.id != id);
        if tables.issues.len() == before {
            return Ok(false);
        }
        tables.notifications.retain(|n| n.issue_id != Some(id));
        Ok(true)
    }
}

#[async_trait]
impl NotificationRepository for MemoryDatabase {
    async fn insert(&self, data: &CreateNotification) -> Result<Notification> {
        if self.fail_notification_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("notification insert failed".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        tables.next_notification_id += 1;
        // Strictly increasing timestamps keep "newest first" deterministic
        let created_at = Utc::now() + Duration::microseconds(tables.next_notification_id);
        let notification = Notification {
            id: tables.next_notification_id,
            user_id: data.user_id,
            issue_id: data.issue_id,
            title: data.title.clone(),
            message: data.message.clone(),
            is_read: false,
            created_at,
        };
        tables.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let tables = self.tables.lock().unwrap();
        let mut matching: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
            .map(|n| {
                n.is_read = true;
                n.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = 0;
        for n in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn authenticated(id: i64, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        name: format!("User {}", id),
        email: format!("user{}@example.com", id),
        role,
    }
}

/// Detached issue value with a generated title and description
pub fn sample_issue(id: i64, reporter_id: i64) -> Issue {
    Issue {
        id,
        title: Sentence(2..5).fake(),
        description: Paragraph(1..3).fake(),
        category: IssueCategory::Infrastructure,
        status: IssueStatus::Pending,
        latitude: 12.9,
        longitude: 77.6,
        image_url: None,
        reporter_id,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn new_issue(reporter_id: i64) -> CreateIssue {
    CreateIssue {
        title: Sentence(2..5).fake(),
        description: Paragraph(1..3).fake(),
        category: IssueCategory::Infrastructure,
        latitude: 12.9,
        longitude: 77.6,
        reporter_id,
    }
}

async fn inject_user_middleware(
    user: AuthenticatedUser,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Stand-in for the JWT middleware: every request runs as `user`
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(move |request: Request, next: Next| {
        inject_user_middleware(user.clone(), request, next)
    }))
}

// =============================================================================
// IMAGE PAYLOADS
// =============================================================================

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn png_bytes() -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]))),
        ImageFormat::Png,
    )
}

pub fn jpeg_bytes() -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([20, 120, 220]))),
        ImageFormat::Jpeg,
    )
}

pub fn gif_bytes() -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, image::Rgba([0, 160, 0, 255]))),
        ImageFormat::Gif,
    )
}
