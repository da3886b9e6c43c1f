use crate::error::RepositoryError;
use crate::models::{NewProduct, Pagination, Product, UpdateProduct};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const PRODUCT_COLUMNS: &str = "id, category_id, name, description, price, stock, \
     image_url, is_active, created_at, updated_at";

/// Repository for storefront products
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO products (category_id, name, description, price, stock, image_url)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Product>(&sql)
            .bind(product.category_id)
            .bind(product.name.trim())
            .bind(&product.description)
            .bind(product.price)
            .bind(product.stock)
            .bind(&product.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list(
        &self,
        category_id: Option<Uuid>,
        include_inactive: bool,
        page: Pagination,
    ) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::UUID IS NULL OR category_id = $1)
              AND ($2 OR is_active)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .bind(include_inactive)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE products
            SET category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                image_url = COALESCE($7, image_url),
                is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(changes.category_id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.price)
            .bind(changes.stock)
            .bind(&changes.image_url)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    /// Products referenced by past orders cannot be removed; deactivate them instead
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
