use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{Booking, NewBooking, Pagination};
use crate::routes::extract::{Json, Path, Query};
use crate::routes::today;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/cancel", post(cancel_booking))
}

/// POST /api/v1/bookings
///
/// # Returns
/// - `201 Created` - booking stored as `pending`
/// - `400 Bad Request` - invalid slot, court, hours or offer code
/// - `404 Not Found` - unknown venue
/// - `409 Conflict` - the court is already taken for part of the slot
async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = state.booking_service.create_booking(&user, payload, today()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(state.booking_service.list_mine(&user, page).await?))
}

async fn get_booking(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Json<Booking>> {
    Ok(Json(state.booking_service.get(&user, id).await?))
}

async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.booking_service.cancel(&user, id).await?))
}
