use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{Coach, NewPackage, Package, UpdateCoach, UpdatePackage};
use crate::routes::extract::{Json, Path};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coaches", get(list_coaches))
        .route("/coaches/:id/packages", get(list_packages))
        .route("/coach/profile", put(update_profile))
        .route("/coach/packages", post(create_package))
        .route("/coach/packages/:id", put(update_package).delete(delete_package))
}

async fn list_coaches(State(state): State<AppState>) -> AppResult<Json<Vec<Coach>>> {
    Ok(Json(state.coach_service.list().await?))
}

async fn list_packages(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Vec<Package>>> {
    Ok(Json(state.coach_service.list_packages(id).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCoach>,
) -> AppResult<Json<Coach>> {
    Ok(Json(state.coach_service.update_profile(&user, payload).await?))
}

async fn create_package(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewPackage>,
) -> AppResult<impl IntoResponse> {
    let package = state.coach_service.create_package(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(package)))
}

async fn update_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePackage>,
) -> AppResult<Json<Package>> {
    Ok(Json(state.coach_service.update_package(&user, id, payload).await?))
}

async fn delete_package(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.coach_service.delete_package(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
