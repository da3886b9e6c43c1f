use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderLine, OrderWithItems, Pagination, Product};
use crate::routes::extract::{Json, Path, Query};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
        .route("/orders", post(place_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/cancel", post(cancel_order))
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(state.product_repo.list(query.category_id, false, page).await?))
}

async fn get_product(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Product>> {
    let product = state
        .product_repo
        .find_by_id(id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct PlaceOrder {
    pub items: Vec<OrderLine>,
}

/// POST /api/v1/orders
///
/// # Returns
/// - `201 Created` - order with its items, stock reserved
/// - `400 Bad Request` - empty order, bad quantity or inactive product
/// - `409 Conflict` - not enough stock for a line
async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PlaceOrder>,
) -> AppResult<impl IntoResponse> {
    let placed = state.order_service.place_order(&user, payload.items).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.order_service.list_mine(&user, page).await?))
}

async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderWithItems>> {
    Ok(Json(state.order_service.get(&user, id).await?))
}

async fn cancel_order(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Json<Order>> {
    Ok(Json(state.order_service.cancel_order(&user, id).await?))
}
