use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{Chat, Message};
use crate::routes::extract::{Json, Path, Query};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chats", get(list_chats).post(open_chat))
        .route("/chats/:id/messages", get(list_messages).post(send_message))
        .route("/chats/:id/read", post(mark_read))
}

async fn list_chats(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Chat>>> {
    Ok(Json(state.chat_service.list_chats(&user).await?))
}

#[derive(Debug, Deserialize)]
pub struct OpenChat {
    pub user_id: Uuid,
}

/// Returns the existing chat for the pair when there is one
async fn open_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OpenChat>,
) -> AppResult<Json<Chat>> {
    Ok(Json(state.chat_service.open_chat(&user, payload.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub before: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}

async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<MessageQuery>,
) -> AppResult<Json<Vec<Message>>> {
    let messages = state
        .chat_service
        .list_messages(&user, id, query.before, query.limit)
        .await?;
    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub body: String,
}

async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendMessage>,
) -> AppResult<impl IntoResponse> {
    let message = state.chat_service.send_message(&user, id, &payload.body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

async fn mark_read(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Json<MarkedRead>> {
    let updated = state.chat_service.mark_read(&user, id).await?;
    Ok(Json(MarkedRead { updated }))
}
