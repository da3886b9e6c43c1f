//! Admin panel endpoints. Every handler takes `AdminUser`, so a missing
//! token is a 401 and a non-admin token is a 403.

use crate::auth::AdminUser;
use crate::error::{AppError, AppResult};
use crate::models::user::{validate_email, validate_level};
use crate::models::{
    Booking, BookingStatus, BookingStatusLabel, Branch, Category, Coach, GlobalConfig, NewBranch, NewCategory,
    NewCoach, NewOffer, NewProduct, NewSponsor, NewSport, NewStory, NewUser, NewVenue, Offer, Order, OrderStatus,
    Pagination, Product, Sponsor, Sport, Story, UpdateBranch, UpdateCoach, UpdateOffer, UpdateProduct,
    UpdateSponsor, UpdateStory, UpdateUser, UpdateVenue, User, Venue, VenueFilter,
};
use crate::repositories::BookingFilter;
use crate::routes::extract::{Json, Path, Query};
use crate::routes::{deleted, validated};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/venues", get(list_venues).post(create_venue))
        .route("/venues/:id", put(update_venue).delete(delete_venue))
        .route("/venues/:id/branches", post(create_branch))
        .route("/branches/:id", put(update_branch).delete(delete_branch))
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id/status", put(update_booking_status))
        .route("/booking-statuses/:code", put(update_status_label))
        .route("/sports", post(create_sport))
        .route("/sports/:id", put(update_sport).delete(delete_sport))
        .route("/categories", post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
        .route("/sponsors", get(list_sponsors).post(create_sponsor))
        .route("/sponsors/:id", put(update_sponsor).delete(delete_sponsor))
        .route("/stories", post(create_story))
        .route("/stories/:id", put(update_story).delete(delete_story))
        .route("/offers", post(create_offer))
        .route("/offers/:id", put(update_offer).delete(delete_offer))
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/coaches", post(create_coach))
        .route("/coaches/:id", put(update_coach).delete(delete_coach))
        .route("/orders", get(list_orders))
        .route("/orders/:id/status", put(update_order_status))
        .route("/config", get(list_config))
        .route("/config/:key", get(get_config).put(set_config).delete(delete_config))
}

// =========================================================================
// Users
// =========================================================================

async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.user_repo.list(page).await?))
}

async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<NewUser>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    validated(validate_email(&payload.email))?;
    if let Some(level) = payload.level {
        validated(validate_level(level))?;
    }

    let user = state.user_repo.create(&payload).await?;
    info!("Admin {} created user {}", admin.id, user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<Json<User>> {
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    if let Some(level) = payload.level {
        validated(validate_level(level))?;
    }
    Ok(Json(state.user_repo.update(id, &payload).await?))
}

async fn delete_user(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.user_repo.delete(id).await?, "User")
}

// =========================================================================
// Venues and branches
// =========================================================================

async fn list_venues(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(mut filter): Query<VenueFilter>,
) -> AppResult<Json<Vec<Venue>>> {
    filter.include_inactive = true;
    Ok(Json(state.venue_repo.list(&filter).await?))
}

async fn create_venue(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewVenue>,
) -> AppResult<impl IntoResponse> {
    validated(payload.validate())?;
    let venue = state.venue_repo.create(&payload).await?;
    info!("Created venue {} ({})", venue.name, venue.id);
    Ok((StatusCode::CREATED, Json(venue)))
}

async fn update_venue(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVenue>,
) -> AppResult<Json<Venue>> {
    validated(payload.validate())?;
    Ok(Json(state.venue_repo.update(id, &payload).await?))
}

async fn delete_venue(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.venue_repo.delete(id).await?, "Venue")
}

async fn create_branch(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(venue_id): Path<Uuid>,
    Json(payload): Json<NewBranch>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() || payload.address.trim().is_empty() {
        return Err(AppError::Validation("Branch name and address are required".into()));
    }
    let branch = state.branch_repo.create(venue_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

async fn update_branch(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBranch>,
) -> AppResult<Json<Branch>> {
    Ok(Json(state.branch_repo.update(id, &payload).await?))
}

async fn delete_branch(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.branch_repo.delete(id).await?, "Branch")
}

// =========================================================================
// Bookings
// =========================================================================

async fn list_bookings(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filter): Query<BookingFilter>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(state.booking_repo.list(&filter).await?))
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

async fn update_booking_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingStatusUpdate>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.booking_service.update_status(id, payload.status).await?))
}

#[derive(Debug, Deserialize)]
pub struct LabelUpdate {
    pub label: String,
}

async fn update_status_label(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(code): Path<String>,
    Json(payload): Json<LabelUpdate>,
) -> AppResult<Json<BookingStatusLabel>> {
    let code = BookingStatus::from_str(&code).map_err(AppError::NotFound)?;
    if payload.label.trim().is_empty() {
        return Err(AppError::Validation("Label cannot be empty".into()));
    }
    Ok(Json(state.booking_repo.update_status_label(code, payload.label.trim()).await?))
}

// =========================================================================
// Reference data
// =========================================================================

async fn create_sport(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewSport>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Sport name is required".into()));
    }
    let sport = state.catalog_repo.create_sport(&payload).await?;
    Ok((StatusCode::CREATED, Json(sport)))
}

async fn update_sport(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewSport>,
) -> AppResult<Json<Sport>> {
    Ok(Json(state.catalog_repo.update_sport(id, &payload).await?))
}

async fn delete_sport(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.catalog_repo.delete_sport(id).await?, "Sport")
}

async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewCategory>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }
    let category = state.catalog_repo.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewCategory>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.catalog_repo.update_category(id, &payload).await?))
}

async fn delete_category(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.catalog_repo.delete_category(id).await?, "Category")
}

async fn list_sponsors(State(state): State<AppState>, _admin: AdminUser) -> AppResult<Json<Vec<Sponsor>>> {
    Ok(Json(state.catalog_repo.list_sponsors(false).await?))
}

async fn create_sponsor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewSponsor>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Sponsor name is required".into()));
    }
    let sponsor = state.catalog_repo.create_sponsor(&payload).await?;
    Ok((StatusCode::CREATED, Json(sponsor)))
}

async fn update_sponsor(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSponsor>,
) -> AppResult<Json<Sponsor>> {
    Ok(Json(state.catalog_repo.update_sponsor(id, &payload).await?))
}

async fn delete_sponsor(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.catalog_repo.delete_sponsor(id).await?, "Sponsor")
}

async fn create_story(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewStory>,
) -> AppResult<impl IntoResponse> {
    if payload.media_url.trim().is_empty() {
        return Err(AppError::Validation("media_url is required".into()));
    }
    let story = state.catalog_repo.create_story(&payload).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

async fn update_story(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStory>,
) -> AppResult<Json<Story>> {
    Ok(Json(state.catalog_repo.update_story(id, &payload).await?))
}

async fn delete_story(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.catalog_repo.delete_story(id).await?, "Story")
}

async fn create_offer(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewOffer>,
) -> AppResult<impl IntoResponse> {
    validated(payload.validate())?;
    let offer = state.offer_repo.create(&payload).await?;
    info!("Created offer {} ({}%)", offer.code, offer.discount_percent);
    Ok((StatusCode::CREATED, Json(offer)))
}

async fn update_offer(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOffer>,
) -> AppResult<Json<Offer>> {
    if matches!(payload.discount_percent, Some(p) if !(1..=100).contains(&p)) {
        return Err(AppError::Validation("discount_percent must be between 1 and 100".into()));
    }
    Ok(Json(state.offer_repo.update(id, &payload).await?))
}

async fn delete_offer(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.offer_repo.delete(id).await?, "Offer")
}

// =========================================================================
// Store
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct AdminProductQuery {
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(state.product_repo.list(query.category_id, true, page).await?))
}

async fn create_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewProduct>,
) -> AppResult<impl IntoResponse> {
    validated(payload.validate())?;
    let product = state.product_repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    if matches!(payload.stock, Some(s) if s < 0) {
        return Err(AppError::Validation("Stock cannot be negative".into()));
    }
    Ok(Json(state.product_repo.update(id, &payload).await?))
}

async fn delete_product(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    deleted(state.product_repo.delete(id).await?, "Product")
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(state.order_service.list(query.status, page).await?))
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

async fn update_order_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.order_service.update_status(id, payload.status).await?))
}

// =========================================================================
// Coaches
// =========================================================================

async fn create_coach(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<NewCoach>,
) -> AppResult<impl IntoResponse> {
    let coach = state.coach_service.create_coach(payload).await?;
    Ok((StatusCode::CREATED, Json(coach)))
}

async fn update_coach(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCoach>,
) -> AppResult<Json<Coach>> {
    Ok(Json(state.coach_repo.update(id, &payload).await?))
}

async fn delete_coach(State(state): State<AppState>, _admin: AdminUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.coach_service.remove_coach(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// Global config
// =========================================================================

async fn list_config(State(state): State<AppState>, _admin: AdminUser) -> AppResult<Json<Vec<GlobalConfig>>> {
    Ok(Json(state.catalog_repo.list_config().await?))
}

async fn get_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> AppResult<Json<GlobalConfig>> {
    let entry = state
        .catalog_repo
        .get_config(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Config key '{}' not found", key)))?;
    Ok(Json(entry))
}

async fn set_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
    Json(value): Json<Value>,
) -> AppResult<Json<GlobalConfig>> {
    Ok(Json(state.catalog_repo.set_config(&key, &value).await?))
}

async fn delete_config(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    deleted(state.catalog_repo.delete_config(&key).await?, "Config key")
}
