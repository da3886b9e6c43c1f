use crate::error::RepositoryError;
use crate::models::{Branch, NewBranch, UpdateBranch};
use sqlx::PgPool;
use uuid::Uuid;

const BRANCH_COLUMNS: &str = "id, venue_id, name, address, phone, is_active, created_at, updated_at";

/// Repository for venue branches
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, venue_id: Uuid, branch: &NewBranch) -> Result<Branch, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO branches (venue_id, name, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {BRANCH_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Branch>(&sql)
            .bind(venue_id)
            .bind(branch.name.trim())
            .bind(&branch.address)
            .bind(&branch.phone)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>, RepositoryError> {
        let sql = format!("SELECT {BRANCH_COLUMNS} FROM branches WHERE id = $1");
        let branch = sqlx::query_as::<_, Branch>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(branch)
    }

    /// All branches of a venue, active first
    pub async fn list_by_venue(&self, venue_id: Uuid) -> Result<Vec<Branch>, RepositoryError> {
        let sql = format!(
            "SELECT {BRANCH_COLUMNS} FROM branches WHERE venue_id = $1 ORDER BY is_active DESC, name ASC"
        );
        let branches = sqlx::query_as::<_, Branch>(&sql)
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(branches)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateBranch) -> Result<Branch, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE branches
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BRANCH_COLUMNS}
            "#
        );

        let branch = sqlx::query_as::<_, Branch>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.address)
            .bind(&changes.phone)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(branch)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
