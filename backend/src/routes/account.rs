use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::user::validate_level;
use crate::models::{UpdateUser, User};
use crate::routes::extract::Json;
use crate::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

async fn get_me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<User>> {
    let me = state
        .user_repo
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(me))
}

/// Fields a user may change on their own profile
#[derive(Debug, Deserialize)]
pub struct UpdateMe {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub level: Option<rust_decimal::Decimal>,
}

async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateMe>,
) -> AppResult<Json<User>> {
    if let Some(level) = payload.level {
        validate_level(level).map_err(AppError::Validation)?;
    }
    if matches!(&payload.name, Some(n) if n.trim().is_empty()) {
        return Err(AppError::Validation("Name cannot be empty".into()));
    }

    let changes = UpdateUser {
        name: payload.name,
        phone: payload.phone,
        avatar_url: payload.avatar_url,
        level: payload.level,
        ..Default::default()
    };
    Ok(Json(state.user_repo.update(user.id, &changes).await?))
}
