//! HTTP surface: public catalog reads, the authenticated customer API under
//! `/api/v1` and the admin panel under `/admin`.

pub mod account;
pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod chats;
pub mod coaching;
pub mod extract;
pub mod matches;
pub mod notifications;
pub mod store;

use crate::error::{AppError, AppResult};
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Assemble every route with tracing and CORS applied
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(catalog::router())
        .merge(account::router())
        .merge(bookings::router())
        .merge(coaching::router())
        .merge(matches::router())
        .merge(store::router())
        .merge(chats::router())
        .merge(notifications::router());

    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .nest("/admin", admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let base = CorsLayer::new().allow_methods(methods).allow_headers(Any);

    if state.config.allows_any_origin() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    base.allow_origin(origins)
}

/// Liveness plus a database round trip
async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    if let Err(e) = crate::database::ping(state.database.pool()).await {
        let err = AppError::from(e);
        if err.is_connection_error() {
            warn!("Health check could not reach the database");
        }
        return Err(err);
    }
    Ok(Json(json!({ "status": "ok" })))
}

/// Current date used for "not in the past" checks
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Map a model-level validation message onto a 400
pub(crate) fn validated(result: Result<(), String>) -> AppResult<()> {
    result.map_err(AppError::Validation)
}

/// 204 when a row was removed, 404 otherwise
pub(crate) fn deleted(removed: bool, what: &str) -> AppResult<StatusCode> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{} not found", what)))
    }
}
