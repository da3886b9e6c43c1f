use crate::error::{AppError, AppResult};
use crate::models::{Notification, NotificationKind, Pagination};
use crate::repositories::NotificationRepository;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Service for in-app notifications
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Record a notification for `user_id`.
    ///
    /// Called after the triggering change has committed, so a failure here
    /// is logged and swallowed rather than failing the request.
    pub async fn notify(&self, user_id: Uuid, kind: NotificationKind, title: &str, body: &str) {
        match self.notification_repo.create(user_id, kind, title, body).await {
            Ok(n) => info!("Notified user {} ({}): {}", user_id, kind.as_str(), n.title),
            Err(e) => warn!("Failed to notify user {}: {}", user_id, e),
        }
    }

    pub async fn list(&self, user_id: Uuid, unread_only: bool, page: Pagination) -> AppResult<Vec<Notification>> {
        Ok(self
            .notification_repo
            .list_for_user(user_id, unread_only, page)
            .await?)
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> AppResult<Notification> {
        self.notification_repo
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let updated = self.notification_repo.mark_all_read(user_id).await?;
        info!("Marked {} notifications read for user {}", updated, user_id);
        Ok(updated)
    }
}
