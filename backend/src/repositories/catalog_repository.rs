//! Data access for admin-managed reference data.

use crate::error::RepositoryError;
use crate::models::{
    Category, GlobalConfig, NewCategory, NewSponsor, NewSport, NewStory, Sponsor, Sport, Story,
    UpdateSponsor, UpdateStory,
};
use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

const SPORT_COLUMNS: &str = "id, name, icon_url, created_at";
const CATEGORY_COLUMNS: &str = "id, name, kind, created_at";
const SPONSOR_COLUMNS: &str = "id, name, logo_url, website_url, priority, is_active, created_at";
const STORY_COLUMNS: &str = "id, title, media_url, link_url, expires_at, is_active, created_at";

/// Repository for sports, categories, sponsors, stories and global config
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn delete_from(&self, table: &'static str, id: Uuid) -> Result<bool, RepositoryError> {
        let sql = format!("DELETE FROM {table} WHERE id = $1");
        let rows_affected = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    // =========================================================================
    // Sports
    // =========================================================================

    pub async fn create_sport(&self, sport: &NewSport) -> Result<Sport, RepositoryError> {
        let sql = format!("INSERT INTO sports (name, icon_url) VALUES ($1, $2) RETURNING {SPORT_COLUMNS}");
        let created = sqlx::query_as::<_, Sport>(&sql)
            .bind(sport.name.trim())
            .bind(&sport.icon_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn list_sports(&self) -> Result<Vec<Sport>, RepositoryError> {
        let sql = format!("SELECT {SPORT_COLUMNS} FROM sports ORDER BY name ASC");
        let sports = sqlx::query_as::<_, Sport>(&sql).fetch_all(&self.pool).await?;
        Ok(sports)
    }

    pub async fn update_sport(&self, id: Uuid, sport: &NewSport) -> Result<Sport, RepositoryError> {
        let sql = format!(
            "UPDATE sports SET name = $2, icon_url = $3 WHERE id = $1 RETURNING {SPORT_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Sport>(&sql)
            .bind(id)
            .bind(sport.name.trim())
            .bind(&sport.icon_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    pub async fn delete_sport(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("sports", id).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, RepositoryError> {
        let sql = format!("INSERT INTO categories (name, kind) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}");
        let created = sqlx::query_as::<_, Category>(&sql)
            .bind(category.name.trim())
            .bind(category.kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY kind ASC, name ASC");
        let categories = sqlx::query_as::<_, Category>(&sql).fetch_all(&self.pool).await?;
        Ok(categories)
    }

    pub async fn update_category(&self, id: Uuid, category: &NewCategory) -> Result<Category, RepositoryError> {
        let sql = format!(
            "UPDATE categories SET name = $2, kind = $3 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(category.name.trim())
            .bind(category.kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("categories", id).await
    }

    // =========================================================================
    // Sponsors
    // =========================================================================

    pub async fn create_sponsor(&self, sponsor: &NewSponsor) -> Result<Sponsor, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO sponsors (name, logo_url, website_url, priority)
            VALUES ($1, $2, $3, COALESCE($4, 0))
            RETURNING {SPONSOR_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Sponsor>(&sql)
            .bind(sponsor.name.trim())
            .bind(&sponsor.logo_url)
            .bind(&sponsor.website_url)
            .bind(sponsor.priority)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Sponsors by descending priority
    pub async fn list_sponsors(&self, active_only: bool) -> Result<Vec<Sponsor>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {SPONSOR_COLUMNS}
            FROM sponsors
            WHERE (NOT $1 OR is_active)
            ORDER BY priority DESC, name ASC
            "#
        );
        let sponsors = sqlx::query_as::<_, Sponsor>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(sponsors)
    }

    pub async fn update_sponsor(&self, id: Uuid, changes: &UpdateSponsor) -> Result<Sponsor, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE sponsors
            SET name = COALESCE($2, name),
                logo_url = COALESCE($3, logo_url),
                website_url = COALESCE($4, website_url),
                priority = COALESCE($5, priority),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING {SPONSOR_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Sponsor>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.logo_url)
            .bind(&changes.website_url)
            .bind(changes.priority)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    pub async fn delete_sponsor(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("sponsors", id).await
    }

    // =========================================================================
    // Stories
    // =========================================================================

    pub async fn create_story(&self, story: &NewStory) -> Result<Story, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO stories (title, media_url, link_url, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {STORY_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Story>(&sql)
            .bind(story.title.trim())
            .bind(&story.media_url)
            .bind(&story.link_url)
            .bind(story.expires_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Active stories that have not expired at `now`, newest first
    pub async fn list_active_stories(&self, now: NaiveDateTime) -> Result<Vec<Story>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {STORY_COLUMNS}
            FROM stories
            WHERE is_active AND (expires_at IS NULL OR expires_at > $1)
            ORDER BY created_at DESC
            "#
        );
        let stories = sqlx::query_as::<_, Story>(&sql)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(stories)
    }

    pub async fn update_story(&self, id: Uuid, changes: &UpdateStory) -> Result<Story, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE stories
            SET title = COALESCE($2, title),
                media_url = COALESCE($3, media_url),
                link_url = COALESCE($4, link_url),
                expires_at = COALESCE($5, expires_at),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING {STORY_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Story>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.media_url)
            .bind(&changes.link_url)
            .bind(changes.expires_at)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    pub async fn delete_story(&self, id: Uuid) -> Result<bool, RepositoryError> {
        self.delete_from("stories", id).await
    }

    // =========================================================================
    // Global config
    // =========================================================================

    pub async fn get_config(&self, key: &str) -> Result<Option<GlobalConfig>, RepositoryError> {
        let entry = sqlx::query_as::<_, GlobalConfig>(
            "SELECT key, value, updated_at FROM global_config WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn list_config(&self) -> Result<Vec<GlobalConfig>, RepositoryError> {
        let entries = sqlx::query_as::<_, GlobalConfig>(
            "SELECT key, value, updated_at FROM global_config ORDER BY key ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Insert or replace a config value
    pub async fn set_config(&self, key: &str, value: &Value) -> Result<GlobalConfig, RepositoryError> {
        let entry = sqlx::query_as::<_, GlobalConfig>(
            r#"
            INSERT INTO global_config (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = NOW()
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    pub async fn delete_config(&self, key: &str) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM global_config WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
