use crate::error::RepositoryError;
use crate::models::chat::ordered_pair;
use crate::models::{Chat, Message};
use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

const CHAT_COLUMNS: &str = "id, user_a, user_b, created_at";
const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, body, read_at, created_at";

/// Repository for direct chats and their messages
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the chat between two users, creating it on first contact
    pub async fn find_or_create(&self, a: Uuid, b: Uuid) -> Result<Chat, RepositoryError> {
        let (user_a, user_b) = ordered_pair(a, b);
        // DO UPDATE so RETURNING yields the existing row too
        let sql = format!(
            r#"
            INSERT INTO chats (user_a, user_b)
            VALUES ($1, $2)
            ON CONFLICT (user_a, user_b) DO UPDATE SET user_a = EXCLUDED.user_a
            RETURNING {CHAT_COLUMNS}
            "#
        );
        let chat = sqlx::query_as::<_, Chat>(&sql)
            .bind(user_a)
            .bind(user_b)
            .fetch_one(&self.pool)
            .await?;
        Ok(chat)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, RepositoryError> {
        let sql = format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = $1");
        let chat = sqlx::query_as::<_, Chat>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(chat)
    }

    /// Chats the user takes part in, most recently active first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Chat>, RepositoryError> {
        let sql = r#"
            SELECT c.id, c.user_a, c.user_b, c.created_at
            FROM chats c
            LEFT JOIN LATERAL (
                SELECT MAX(created_at) AS last_at FROM messages m WHERE m.chat_id = c.id
            ) last ON TRUE
            WHERE c.user_a = $1 OR c.user_b = $1
            ORDER BY COALESCE(last.last_at, c.created_at) DESC
        "#;
        let chats = sqlx::query_as::<_, Chat>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(chats)
    }

    pub async fn send_message(&self, chat_id: Uuid, sender_id: Uuid, body: &str) -> Result<Message, RepositoryError> {
        let sql = format!(
            "INSERT INTO messages (chat_id, sender_id, body) VALUES ($1, $2, $3) RETURNING {MESSAGE_COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(chat_id)
            .bind(sender_id)
            .bind(body)
            .fetch_one(&self.pool)
            .await?;
        Ok(message)
    }

    /// Page backwards through history: newest first, strictly older than `before`
    pub async fn list_messages(
        &self,
        chat_id: Uuid,
        before: Option<NaiveDateTime>,
        limit: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE chat_id = $1
              AND ($2::TIMESTAMP IS NULL OR created_at < $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        );
        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(chat_id)
            .bind(before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    /// Mark messages sent by the other participant as read; returns how many changed
    pub async fn mark_read(&self, chat_id: Uuid, reader_id: Uuid) -> Result<u64, RepositoryError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE messages
            SET read_at = NOW()
            WHERE chat_id = $1 AND sender_id <> $2 AND read_at IS NULL
            "#,
        )
        .bind(chat_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(rows_affected)
    }
}
