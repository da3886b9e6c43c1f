use crate::error::RepositoryError;
use crate::models::{Notification, NotificationKind, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, body, kind, read_at, created_at";

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
    ) -> Result<Notification, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO notifications (user_id, title, body, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(title)
            .bind(body)
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(notification)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Pagination,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(unread_only)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    /// Mark one notification read; `None` unless it belongs to `user_id`
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(notification)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        let rows_affected =
            sqlx::query("UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL")
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(rows_affected)
    }
}
