use crate::error::RepositoryError;
use crate::models::{Match, MatchRequest, MatchStatus, NewMatch, Pagination, RequestStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const MATCH_COLUMNS: &str = "id, creator_id, venue_id, date, start_time, level_min, level_max, \
     max_players, status, description, created_at, updated_at";
const REQUEST_COLUMNS: &str = "id, match_id, user_id, status, created_at, updated_at";

/// Outcome of answering a join request
#[derive(Debug, Clone)]
pub struct RequestDecision {
    pub request: MatchRequest,
    pub game: Match,
}

/// Repository for open matches and join requests
pub struct MatchRepository {
    pool: PgPool,
}

impl MatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, creator_id: Uuid, game: &NewMatch) -> Result<Match, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO matches (creator_id, venue_id, date, start_time, level_min, level_max,
                                 max_players, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MATCH_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Match>(&sql)
            .bind(creator_id)
            .bind(game.venue_id)
            .bind(game.date)
            .bind(game.start_time)
            .bind(game.level_min())
            .bind(game.level_max())
            .bind(game.max_players())
            .bind(&game.description)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Match>, RepositoryError> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1");
        let game = sqlx::query_as::<_, Match>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    /// Open matches from `from_date` on, soonest first.
    ///
    /// `level` keeps only matches whose `[level_min, level_max]` contains it.
    pub async fn list_open(
        &self,
        from_date: NaiveDate,
        on_date: Option<NaiveDate>,
        level: Option<Decimal>,
        page: Pagination,
    ) -> Result<Vec<Match>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {MATCH_COLUMNS}
            FROM matches
            WHERE status = $1
              AND date >= $2
              AND ($3::DATE IS NULL OR date = $3)
              AND ($4::NUMERIC IS NULL OR (level_min <= $4 AND level_max >= $4))
            ORDER BY date ASC, start_time ASC
            LIMIT $5 OFFSET $6
            "#
        );
        let games = sqlx::query_as::<_, Match>(&sql)
            .bind(MatchStatus::Open.as_str())
            .bind(from_date)
            .bind(on_date)
            .bind(level)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(games)
    }

    pub async fn set_status(&self, id: Uuid, status: MatchStatus) -> Result<Match, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE matches
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {MATCH_COLUMNS}
            "#
        );
        let game = sqlx::query_as::<_, Match>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(game)
    }

    // =========================================================================
    // Join requests
    // =========================================================================

    /// Record a join request; a second request by the same user is a duplicate
    pub async fn create_request(&self, match_id: Uuid, user_id: Uuid) -> Result<MatchRequest, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO match_requests (match_id, user_id)
            VALUES ($1, $2)
            RETURNING {REQUEST_COLUMNS}
            "#
        );
        let request = sqlx::query_as::<_, MatchRequest>(&sql)
            .bind(match_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(request)
    }

    pub async fn find_request(&self, id: Uuid) -> Result<Option<MatchRequest>, RepositoryError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM match_requests WHERE id = $1");
        let request = sqlx::query_as::<_, MatchRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(request)
    }

    pub async fn list_requests(&self, match_id: Uuid) -> Result<Vec<MatchRequest>, RepositoryError> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM match_requests WHERE match_id = $1 ORDER BY created_at ASC"
        );
        let requests = sqlx::query_as::<_, MatchRequest>(&sql)
            .bind(match_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(requests)
    }

    /// Accepted join requests of a match; runs on the pool or inside a transaction
    pub async fn count_accepted<'e, E>(executor: E, match_id: Uuid) -> Result<i64, RepositoryError>
    where
        E: PgExecutor<'e>,
    {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM match_requests WHERE match_id = $1 AND status = $2")
                .bind(match_id)
                .bind(RequestStatus::Accepted.as_str())
                .fetch_one(executor)
                .await?;
        Ok(count)
    }

    /// Accept or reject a pending request.
    ///
    /// The match row is locked so concurrent acceptances cannot push the
    /// player count past `max_players`. Filling the last seat flips the match
    /// to `full`.
    pub async fn respond_request(&self, request_id: Uuid, accept: bool) -> Result<RequestDecision, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let request_sql = format!("SELECT {REQUEST_COLUMNS} FROM match_requests WHERE id = $1 FOR UPDATE");
        let request = sqlx::query_as::<_, MatchRequest>(&request_sql)
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Match request not found".to_string()))?;

        if request.status_enum() != RequestStatus::Pending {
            return Err(RepositoryError::InvalidInput(format!(
                "Request already {}",
                request.status
            )));
        }

        let match_sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE");
        let game = sqlx::query_as::<_, Match>(&match_sql)
            .bind(request.match_id)
            .fetch_one(&mut *tx)
            .await?;

        if accept && !game.is_open() {
            return Err(RepositoryError::BusinessRule(format!("Match is {}", game.status)));
        }

        let accepted = Self::count_accepted(&mut *tx, game.id).await?;

        if accept && !game.has_room_for_another(accepted) {
            return Err(RepositoryError::BusinessRule("Match is full".to_string()));
        }

        let next = if accept {
            RequestStatus::Accepted
        } else {
            RequestStatus::Rejected
        };
        let update_sql = format!(
            r#"
            UPDATE match_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        );
        let request = sqlx::query_as::<_, MatchRequest>(&update_sql)
            .bind(request.id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let game = if accept && game.players_with(accepted + 1) >= i64::from(game.max_players) {
            let full_sql = format!(
                "UPDATE matches SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {MATCH_COLUMNS}"
            );
            sqlx::query_as::<_, Match>(&full_sql)
                .bind(game.id)
                .bind(MatchStatus::Full.as_str())
                .fetch_one(&mut *tx)
                .await?
        } else {
            game
        };

        tx.commit().await?;
        Ok(RequestDecision { request, game })
    }
}
