use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::chat::validate_body;
use crate::models::{Chat, Message, NotificationKind, DEFAULT_LIMIT, MAX_LIMIT};
use crate::repositories::{ChatRepository, UserRepository};
use crate::services::NotificationService;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for direct messages between users
pub struct ChatService {
    chat_repo: Arc<ChatRepository>,
    user_repo: Arc<UserRepository>,
    notifications: Arc<NotificationService>,
}

impl ChatService {
    pub fn new(
        chat_repo: Arc<ChatRepository>,
        user_repo: Arc<UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            chat_repo,
            user_repo,
            notifications,
        }
    }

    /// Existing chat with `other_user_id`, or a new one
    pub async fn open_chat(&self, user: &AuthUser, other_user_id: Uuid) -> AppResult<Chat> {
        if other_user_id == user.id {
            return Err(AppError::Validation("Cannot open a chat with yourself".into()));
        }
        self.user_repo
            .find_by_id(other_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        Ok(self.chat_repo.find_or_create(user.id, other_user_id).await?)
    }

    pub async fn list_chats(&self, user: &AuthUser) -> AppResult<Vec<Chat>> {
        Ok(self.chat_repo.list_for_user(user.id).await?)
    }

    async fn participant_chat(&self, user: &AuthUser, chat_id: Uuid) -> AppResult<Chat> {
        let chat = self
            .chat_repo
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".into()))?;
        if !chat.has_participant(user.id) {
            return Err(AppError::Forbidden("Not a participant of this chat".into()));
        }
        Ok(chat)
    }

    pub async fn send_message(&self, user: &AuthUser, chat_id: Uuid, body: &str) -> AppResult<Message> {
        let chat = self.participant_chat(user, chat_id).await?;
        let body = validate_body(body).map_err(AppError::Validation)?;

        let message = self.chat_repo.send_message(chat.id, user.id, body).await?;
        info!("Message {} sent in chat {}", message.id, chat.id);

        let preview: String = body.chars().take(80).collect();
        self.notifications
            .notify(chat.other_participant(user.id), NotificationKind::Chat, "New message", &preview)
            .await;
        Ok(message)
    }

    /// Newest first; pass the oldest `created_at` seen as `before` for the next page
    pub async fn list_messages(
        &self,
        user: &AuthUser,
        chat_id: Uuid,
        before: Option<NaiveDateTime>,
        limit: Option<i64>,
    ) -> AppResult<Vec<Message>> {
        let chat = self.participant_chat(user, chat_id).await?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Ok(self.chat_repo.list_messages(chat.id, before, limit).await?)
    }

    pub async fn mark_read(&self, user: &AuthUser, chat_id: Uuid) -> AppResult<u64> {
        let chat = self.participant_chat(user, chat_id).await?;
        Ok(self.chat_repo.mark_read(chat.id, user.id).await?)
    }
}
