use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::{Match, MatchRequest, MatchStatus, NewMatch, NotificationKind, Pagination, RequestStatus};
use crate::repositories::{MatchRepository, RequestDecision, UserRepository};
use crate::services::NotificationService;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service for open games and partner finding
pub struct MatchService {
    match_repo: Arc<MatchRepository>,
    user_repo: Arc<UserRepository>,
    notifications: Arc<NotificationService>,
}

impl MatchService {
    pub fn new(
        match_repo: Arc<MatchRepository>,
        user_repo: Arc<UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            match_repo,
            user_repo,
            notifications,
        }
    }

    pub async fn create_match(&self, creator: &AuthUser, req: NewMatch, today: NaiveDate) -> AppResult<Match> {
        req.validate(today).map_err(AppError::Validation)?;
        let game = self.match_repo.create(creator.id, &req).await?;
        info!(
            "Created match {} by {} on {} ({} players)",
            game.id, creator.id, game.date, game.max_players
        );
        Ok(game)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Match> {
        self.match_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match not found".into()))
    }

    /// Open matches from today on, optionally on one date and suiting one level
    pub async fn list_open(
        &self,
        today: NaiveDate,
        date: Option<NaiveDate>,
        level: Option<Decimal>,
        page: Pagination,
    ) -> AppResult<Vec<Match>> {
        Ok(self.match_repo.list_open(today, date, level, page).await?)
    }

    pub async fn request_join(&self, user: &AuthUser, match_id: Uuid) -> AppResult<MatchRequest> {
        let game = self.get(match_id).await?;

        if !game.is_open() {
            return Err(AppError::Validation(format!("Match is {}", game.status)));
        }
        if game.creator_id == user.id {
            return Err(AppError::Validation("You created this match".into()));
        }

        let request = self.match_repo.create_request(match_id, user.id).await?;
        info!("User {} requested to join match {}", user.id, match_id);

        let requester = self.user_repo.find_by_id(user.id).await?;
        let who = requester.map(|u| u.name).unwrap_or_else(|| "A player".to_string());
        self.notifications
            .notify(
                game.creator_id,
                NotificationKind::Match,
                "New join request",
                &format!("{} wants to join your match on {}", who, game.date),
            )
            .await;

        Ok(request)
    }

    /// Join requests of a match, visible to its creator
    pub async fn list_requests(&self, user: &AuthUser, match_id: Uuid) -> AppResult<Vec<MatchRequest>> {
        let game = self.get(match_id).await?;
        user.require_owner_or_admin(game.creator_id)?;
        Ok(self.match_repo.list_requests(match_id).await?)
    }

    /// Accept or reject a join request as the match creator
    pub async fn respond(&self, creator: &AuthUser, request_id: Uuid, accept: bool) -> AppResult<RequestDecision> {
        let request = self
            .match_repo
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Match request not found".into()))?;

        let game = self.get(request.match_id).await?;
        if game.creator_id != creator.id {
            return Err(AppError::Forbidden("Only the match creator can respond".into()));
        }

        let decision = self.match_repo.respond_request(request_id, accept).await?;
        let status = decision.request.status_enum();
        info!(
            "Request {} {} (match {} now {})",
            request_id,
            status.as_str(),
            decision.game.id,
            decision.game.status
        );

        let title = if status == RequestStatus::Accepted {
            "Join request accepted"
        } else {
            "Join request rejected"
        };
        self.notifications
            .notify(
                decision.request.user_id,
                NotificationKind::Match,
                title,
                &format!("Match on {} at {}", decision.game.date, decision.game.start_time.format("%H:%M")),
            )
            .await;

        Ok(decision)
    }

    pub async fn cancel_match(&self, user: &AuthUser, match_id: Uuid) -> AppResult<Match> {
        let game = self.get(match_id).await?;
        user.require_owner_or_admin(game.creator_id)?;

        if !game.status_enum().is_cancellable() {
            return Err(AppError::Validation(format!("Match is already {}", game.status)));
        }

        let game = self.match_repo.set_status(match_id, MatchStatus::Cancelled).await?;
        info!("Match {} cancelled by {}", match_id, user.id);
        Ok(game)
    }
}
