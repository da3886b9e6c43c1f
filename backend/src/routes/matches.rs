use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{Match, MatchRequest, NewMatch, Pagination};
use crate::routes::extract::{Json, Path, Query};
use crate::routes::today;
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route("/matches/:id", get(get_match))
        .route("/matches/:id/cancel", post(cancel_match))
        .route("/matches/:id/requests", post(request_join).get(list_requests))
        .route("/match-requests/:id/respond", post(respond))
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub date: Option<NaiveDate>,
    pub level: Option<Decimal>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_matches(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MatchQuery>,
) -> AppResult<Json<Vec<Match>>> {
    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    let games = state
        .match_service
        .list_open(today(), query.date, query.level, page)
        .await?;
    Ok(Json(games))
}

async fn create_match(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewMatch>,
) -> AppResult<impl IntoResponse> {
    let game = state.match_service.create_match(&user, payload, today()).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

async fn get_match(State(state): State<AppState>, _user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Json<Match>> {
    Ok(Json(state.match_service.get(id).await?))
}

async fn cancel_match(State(state): State<AppState>, user: AuthUser, Path(id): Path<Uuid>) -> AppResult<Json<Match>> {
    Ok(Json(state.match_service.cancel_match(&user, id).await?))
}

async fn request_join(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let request = state.match_service.request_join(&user, id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MatchRequest>>> {
    Ok(Json(state.match_service.list_requests(&user, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct RespondPayload {
    pub accept: bool,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub request: MatchRequest,
    #[serde(rename = "match")]
    pub game: Match,
}

/// POST /api/v1/match-requests/:id/respond
///
/// Only the match creator may answer. Accepting into a full match is a 409.
async fn respond(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondPayload>,
) -> AppResult<Json<RespondResponse>> {
    let decision = state.match_service.respond(&user, id, payload.accept).await?;
    Ok(Json(RespondResponse {
        request: decision.request,
        game: decision.game,
    }))
}
