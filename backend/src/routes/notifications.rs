use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{Notification, Pagination};
use crate::routes::extract::{Json, Path, Query};
use crate::AppState;
use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id/read", post(mark_read))
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(state.notification_service.list(user.id, query.unread, page).await?))
}

async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    Ok(Json(state.notification_service.mark_read(user.id, id).await?))
}

#[derive(Debug, Serialize)]
pub struct MarkedAllRead {
    pub updated: u64,
}

async fn mark_all_read(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<MarkedAllRead>> {
    let updated = state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(MarkedAllRead { updated }))
}
