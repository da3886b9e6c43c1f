use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderLine, OrderStatus, OrderWithItems, NotificationKind, Pagination};
use crate::repositories::OrderRepository;
use crate::services::NotificationService;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Service for storefront orders
pub struct OrderService {
    order_repo: Arc<OrderRepository>,
    notifications: Arc<NotificationService>,
}

impl OrderService {
    pub fn new(order_repo: Arc<OrderRepository>, notifications: Arc<NotificationService>) -> Self {
        Self {
            order_repo,
            notifications,
        }
    }

    pub async fn place_order(&self, user: &AuthUser, lines: Vec<OrderLine>) -> AppResult<OrderWithItems> {
        info!("Placing order for user {} ({} lines)", user.id, lines.len());

        let placed = self.order_repo.place_order(user.id, &lines).await.map_err(|e| {
            warn!("Order rejected for user {}: {}", user.id, e);
            AppError::from(e)
        })?;

        info!("Order {} placed, total {}", placed.order.id, placed.order.total);
        self.notifications
            .notify(
                user.id,
                NotificationKind::Order,
                "Order placed",
                &format!("Order total {}", placed.order.total),
            )
            .await;
        Ok(placed)
    }

    pub async fn get(&self, user: &AuthUser, id: Uuid) -> AppResult<OrderWithItems> {
        let found = self
            .order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
        user.require_owner_or_admin(found.order.user_id)?;
        Ok(found)
    }

    pub async fn list_mine(&self, user: &AuthUser, page: Pagination) -> AppResult<Vec<Order>> {
        Ok(self.order_repo.list_by_user(user.id, page).await?)
    }

    pub async fn list(&self, status: Option<OrderStatus>, page: Pagination) -> AppResult<Vec<Order>> {
        Ok(self.order_repo.list(status, page).await?)
    }

    /// Owner cancellation while the order is still pending
    pub async fn cancel_order(&self, user: &AuthUser, id: Uuid) -> AppResult<Order> {
        let found = self.get(user, id).await?;
        if found.order.status_enum() != OrderStatus::Pending {
            return Err(AppError::Validation(format!(
                "Only pending orders can be cancelled (order is {})",
                found.order.status
            )));
        }
        let order = self.order_repo.transition_status(id, OrderStatus::Cancelled).await?;
        info!("Order {} cancelled by {}, stock restored", id, user.id);
        Ok(order)
    }

    /// Admin lifecycle change
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> AppResult<Order> {
        let order = self.order_repo.transition_status(id, next).await?;
        info!("Order {} moved to {}", id, order.status);

        self.notifications
            .notify(
                order.user_id,
                NotificationKind::Order,
                "Order updated",
                &format!("Your order is now {}", order.status),
            )
            .await;
        Ok(order)
    }
}
