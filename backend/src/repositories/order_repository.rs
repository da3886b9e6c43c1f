use crate::error::RepositoryError;
use crate::models::store::normalize_lines;
use crate::models::{Order, OrderItem, OrderLine, OrderStatus, OrderWithItems, Pagination, Product};
use crate::repositories::product_repository::PRODUCT_COLUMNS;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, user_id, status, total, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, unit_price";

/// Repository for store orders
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Place an order, reserving stock for every line.
    ///
    /// Products are locked in ascending id order. Either every line is
    /// reserved and the order is written, or nothing changes.
    pub async fn place_order(&self, user_id: Uuid, lines: &[OrderLine]) -> Result<OrderWithItems, RepositoryError> {
        let lines = normalize_lines(lines).map_err(RepositoryError::InvalidInput)?;
        let mut tx = self.pool.begin().await?;

        let lock_sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE");
        let mut priced = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in &lines {
            let product = sqlx::query_as::<_, Product>(&lock_sql)
                .bind(line.product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("Product {} not found", line.product_id)))?;

            if !product.is_active {
                return Err(RepositoryError::InvalidInput(format!(
                    "Product '{}' is not available",
                    product.name
                )));
            }
            if product.stock < line.quantity {
                return Err(RepositoryError::BusinessRule(format!(
                    "Insufficient stock for '{}': {} left",
                    product.name, product.stock
                )));
            }

            sqlx::query("UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1")
                .bind(product.id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;

            total += product.price * Decimal::from(line.quantity);
            priced.push((*line, product.price));
        }

        let order_sql = format!(
            "INSERT INTO orders (user_id, status, total) VALUES ($1, $2, $3) RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&order_sql)
            .bind(user_id)
            .bind(OrderStatus::Pending.as_str())
            .bind(total)
            .fetch_one(&mut *tx)
            .await?;

        let item_sql = format!(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "#
        );
        let mut items = Vec::with_capacity(priced.len());
        for (line, unit_price) in priced {
            let item = sqlx::query_as::<_, OrderItem>(&item_sql)
                .bind(order.id)
                .bind(line.product_id)
                .bind(line.quantity)
                .bind(unit_price)
                .fetch_one(&mut *tx)
                .await?;
            items.push(item);
        }

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderWithItems>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match order {
            Some(order) => {
                let items = self.items_for(order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    async fn items_for(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepositoryError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY product_id");
        let items = sqlx::query_as::<_, OrderItem>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn list_by_user(&self, user_id: Uuid, page: Pagination) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn list(&self, status: Option<OrderStatus>, page: Pagination) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(status.map(|s| s.as_str()))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn lock_order(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<Order, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Order not found".to_string()))
    }

    /// Move an order to `next`; cancelling puts the reserved stock back
    pub async fn transition_status(&self, id: Uuid, next: OrderStatus) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let order = Self::lock_order(&mut tx, id).await?;

        let current = order.status_enum();
        if !current.can_transition_to(next) {
            return Err(RepositoryError::InvalidInput(format!(
                "Cannot move order from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }

        if next == OrderStatus::Cancelled {
            sqlx::query(
                r#"
                UPDATE products p
                SET stock = p.stock + i.quantity, updated_at = NOW()
                FROM order_items i
                WHERE i.order_id = $1 AND i.product_id = p.id
                "#,
            )
            .bind(order.id)
            .execute(&mut *tx)
            .await?;
        }

        let sql = format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Order>(&sql)
            .bind(order.id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
