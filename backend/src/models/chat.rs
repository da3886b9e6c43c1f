use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Longest accepted message body, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Direct conversation between two users, stored with `user_a < user_b`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub created_at: NaiveDateTime,
}

impl Chat {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: Uuid) -> Uuid {
        if self.user_a == user_id {
            self.user_b
        } else {
            self.user_a
        }
    }
}

/// Order a pair the way the `chats` table stores it
pub fn ordered_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

pub fn validate_body(body: &str) -> Result<&str, String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err("Message body cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(format!("Message body exceeds {} characters", MAX_MESSAGE_CHARS));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_pair_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(ordered_pair(a, b), ordered_pair(b, a));
        let (lo, hi) = ordered_pair(a, b);
        assert!(lo < hi);
    }

    #[test]
    fn test_other_participant() {
        let (a, b) = ordered_pair(Uuid::new_v4(), Uuid::new_v4());
        let chat = Chat {
            id: Uuid::new_v4(),
            user_a: a,
            user_b: b,
            created_at: chrono::Utc::now().naive_utc(),
        };
        assert_eq!(chat.other_participant(a), b);
        assert_eq!(chat.other_participant(b), a);
        assert!(!chat.has_participant(Uuid::new_v4()));
    }

    #[test]
    fn test_validate_body() {
        assert_eq!(validate_body("  hola  "), Ok("hola"));
        assert!(validate_body("   ").is_err());
        assert!(validate_body(&"x".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
        assert!(validate_body(&"ñ".repeat(MAX_MESSAGE_CHARS)).is_ok());
    }
}
