use crate::error::RepositoryError;
use crate::models::{Coach, NewCoach, NewPackage, Package, UpdateCoach, UpdatePackage, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

const COACH_COLUMNS: &str = "id, user_id, bio, hourly_rate, rating, created_at, updated_at";
const PACKAGE_COLUMNS: &str =
    "id, coach_id, title, description, sessions, price, duration_days, is_active, created_at, updated_at";

/// Repository for coach profiles and their packages
pub struct CoachRepository {
    pool: PgPool,
}

impl CoachRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the coach profile and promote the user to the coach role
    pub async fn create(&self, coach: &NewCoach) -> Result<Coach, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let promoted = sqlx::query(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 AND role <> 'admin'",
        )
        .bind(coach.user_id)
        .bind(UserRole::Coach.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if promoted == 0 {
            let exists = sqlx::query("SELECT 1 FROM users WHERE id = $1")
                .bind(coach.user_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound("User not found".to_string()));
            }
        }

        let sql = format!(
            r#"
            INSERT INTO coaches (user_id, bio, hourly_rate)
            VALUES ($1, $2, $3)
            RETURNING {COACH_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Coach>(&sql)
            .bind(coach.user_id)
            .bind(&coach.bio)
            .bind(coach.hourly_rate)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Coach>, RepositoryError> {
        let sql = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE id = $1");
        let coach = sqlx::query_as::<_, Coach>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(coach)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Coach>, RepositoryError> {
        let sql = format!("SELECT {COACH_COLUMNS} FROM coaches WHERE user_id = $1");
        let coach = sqlx::query_as::<_, Coach>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(coach)
    }

    /// Coaches ordered by rating, unrated last
    pub async fn list(&self) -> Result<Vec<Coach>, RepositoryError> {
        let sql = format!(
            "SELECT {COACH_COLUMNS} FROM coaches ORDER BY rating DESC NULLS LAST, created_at ASC"
        );
        let coaches = sqlx::query_as::<_, Coach>(&sql).fetch_all(&self.pool).await?;
        Ok(coaches)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateCoach) -> Result<Coach, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE coaches
            SET bio = COALESCE($2, bio),
                hourly_rate = COALESCE($3, hourly_rate),
                rating = COALESCE($4, rating),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COACH_COLUMNS}
            "#
        );
        let coach = sqlx::query_as::<_, Coach>(&sql)
            .bind(id)
            .bind(&changes.bio)
            .bind(changes.hourly_rate)
            .bind(changes.rating)
            .fetch_one(&self.pool)
            .await?;
        Ok(coach)
    }

    /// Remove the profile and demote the user back to a regular account
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<Uuid> = sqlx::query_scalar("DELETE FROM coaches WHERE id = $1 RETURNING user_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user_id) = user_id else {
            return Ok(false);
        };

        sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 AND role = $3")
            .bind(user_id)
            .bind(UserRole::User.as_str())
            .bind(UserRole::Coach.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // =========================================================================
    // Packages
    // =========================================================================

    pub async fn create_package(&self, coach_id: Uuid, package: &NewPackage) -> Result<Package, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO packages (coach_id, title, description, sessions, price, duration_days)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 30))
            RETURNING {PACKAGE_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Package>(&sql)
            .bind(coach_id)
            .bind(package.title.trim())
            .bind(&package.description)
            .bind(package.sessions)
            .bind(package.price)
            .bind(package.duration_days)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn find_package(&self, id: Uuid) -> Result<Option<Package>, RepositoryError> {
        let sql = format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1");
        let package = sqlx::query_as::<_, Package>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(package)
    }

    pub async fn list_packages_by_coach(
        &self,
        coach_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Package>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {PACKAGE_COLUMNS}
            FROM packages
            WHERE coach_id = $1 AND (NOT $2 OR is_active)
            ORDER BY price ASC
            "#
        );
        let packages = sqlx::query_as::<_, Package>(&sql)
            .bind(coach_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(packages)
    }

    pub async fn update_package(&self, id: Uuid, changes: &UpdatePackage) -> Result<Package, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE packages
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                sessions = COALESCE($4, sessions),
                price = COALESCE($5, price),
                duration_days = COALESCE($6, duration_days),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PACKAGE_COLUMNS}
            "#
        );
        let package = sqlx::query_as::<_, Package>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.sessions)
            .bind(changes.price)
            .bind(changes.duration_days)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(package)
    }

    pub async fn delete_package(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
