//! Public read-only endpoints for browsing venues and reference data.

use crate::error::{AppError, AppResult};
use crate::models::{BookingStatusLabel, Branch, Category, Offer, Sponsor, Sport, Story, Venue, VenueFilter};
use crate::routes::extract::{Json, Path, Query};
use crate::routes::today;
use crate::services::VenueAvailability;
use crate::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sports", get(list_sports))
        .route("/categories", get(list_categories))
        .route("/sponsors", get(list_sponsors))
        .route("/stories", get(list_stories))
        .route("/offers", get(list_offers))
        .route("/booking-statuses", get(list_booking_statuses))
        .route("/venues", get(list_venues))
        .route("/venues/:id", get(get_venue))
        .route("/venues/:id/branches", get(list_branches))
        .route("/venues/:id/availability", get(availability))
}

async fn list_sports(State(state): State<AppState>) -> AppResult<Json<Vec<Sport>>> {
    Ok(Json(state.catalog_repo.list_sports().await?))
}

async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog_repo.list_categories().await?))
}

async fn list_sponsors(State(state): State<AppState>) -> AppResult<Json<Vec<Sponsor>>> {
    Ok(Json(state.catalog_repo.list_sponsors(true).await?))
}

async fn list_stories(State(state): State<AppState>) -> AppResult<Json<Vec<Story>>> {
    let now = chrono::Utc::now().naive_utc();
    Ok(Json(state.catalog_repo.list_active_stories(now).await?))
}

async fn list_offers(State(state): State<AppState>) -> AppResult<Json<Vec<Offer>>> {
    Ok(Json(state.offer_repo.list_current(today()).await?))
}

async fn list_booking_statuses(State(state): State<AppState>) -> AppResult<Json<Vec<BookingStatusLabel>>> {
    Ok(Json(state.booking_repo.list_status_labels().await?))
}

/// GET /api/v1/venues?city&sport_id&limit&offset
///
/// Inactive venues are hidden from the public listing.
async fn list_venues(
    State(state): State<AppState>,
    Query(mut filter): Query<VenueFilter>,
) -> AppResult<Json<Vec<Venue>>> {
    filter.include_inactive = false;
    Ok(Json(state.venue_repo.list(&filter).await?))
}

async fn get_venue(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Venue>> {
    let venue = state
        .venue_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Venue not found".into()))?;
    Ok(Json(venue))
}

async fn list_branches(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Vec<Branch>>> {
    Ok(Json(state.branch_repo.list_by_venue(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

async fn availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<VenueAvailability>> {
    Ok(Json(state.booking_service.availability(id, query.date).await?))
}
