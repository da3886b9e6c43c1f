use crate::error::RepositoryError;
use crate::models::{NewUser, Pagination, UpdateUser, User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, name, email, phone, role, avatar_url, level, is_active, created_at, updated_at";

/// Repository for user data access
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    pub async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let role = user.role.unwrap_or(UserRole::User);
        let sql = format!(
            r#"
            INSERT INTO users (name, email, phone, role, avatar_url, level)
            VALUES ($1, LOWER($2), $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.name.trim())
            .bind(user.email.trim())
            .bind(&user.phone)
            .bind(role.as_str())
            .bind(&user.avatar_url)
            .bind(user.level)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Find a user by UUID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List users, newest first
    pub async fn list(&self, page: Pagination) -> Result<Vec<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Apply a partial update
    pub async fn update(&self, id: Uuid, changes: &UpdateUser) -> Result<User, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                level = COALESCE($5, level),
                role = COALESCE($6, role),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.phone)
            .bind(&changes.avatar_url)
            .bind(changes.level)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Change only the role
    pub async fn set_role(&self, id: Uuid, role: UserRole) -> Result<User, RepositoryError> {
        let changes = UpdateUser {
            role: Some(role),
            ..UpdateUser::default()
        };
        self.update(id, &changes).await
    }

    /// Delete a user (cascades to bookings, chats, notifications)
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
