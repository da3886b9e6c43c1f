use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Open game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Open,
    Full,
    Cancelled,
    Completed,
}

impl MatchStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "open" => Ok(MatchStatus::Open),
            "full" => Ok(MatchStatus::Full),
            "cancelled" => Ok(MatchStatus::Cancelled),
            "completed" => Ok(MatchStatus::Completed),
            _ => Err(format!("Invalid match status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Open => "open",
            MatchStatus::Full => "full",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, MatchStatus::Open | MatchStatus::Full)
    }
}

/// Join request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// An open padel game looking for partners
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Match {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub venue_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub level_min: Decimal,
    pub level_max: Decimal,
    pub max_players: i32,
    pub status: String, // Stored as TEXT, use MatchStatus enum for type safety
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Match {
    pub fn status_enum(&self) -> MatchStatus {
        MatchStatus::from_str(&self.status).unwrap_or(MatchStatus::Open)
    }

    pub fn is_open(&self) -> bool {
        self.status_enum() == MatchStatus::Open
    }

    /// Players on court given `accepted` join requests; the creator always plays
    pub fn players_with(&self, accepted: i64) -> i64 {
        accepted + 1
    }

    pub fn has_room_for_another(&self, accepted: i64) -> bool {
        self.players_with(accepted) < i64::from(self.max_players)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMatch {
    pub venue_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub level_min: Option<Decimal>,
    pub level_max: Option<Decimal>,
    pub max_players: Option<i32>,
    pub description: Option<String>,
}

impl NewMatch {
    pub fn level_min(&self) -> Decimal {
        self.level_min.unwrap_or(Decimal::ONE)
    }

    pub fn level_max(&self) -> Decimal {
        self.level_max.unwrap_or(Decimal::new(7, 0))
    }

    pub fn max_players(&self) -> i32 {
        self.max_players.unwrap_or(4)
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if self.date < today {
            return Err("Match date cannot be in the past".to_string());
        }
        if self.level_min() > self.level_max() {
            return Err("level_min must not exceed level_max".to_string());
        }
        if !matches!(self.max_players(), 2 | 4) {
            return Err("max_players must be 2 or 4".to_string());
        }
        Ok(())
    }
}

/// A user's request to join a match
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRequest {
    pub id: Uuid,
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub status: String, // Stored as TEXT, use RequestStatus enum for type safety
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MatchRequest {
    pub fn status_enum(&self) -> RequestStatus {
        RequestStatus::from_str(&self.status).unwrap_or(RequestStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(max_players: i32) -> Match {
        let now = chrono::Utc::now().naive_utc();
        Match {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            venue_id: None,
            date: now.date(),
            start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            level_min: Decimal::new(25, 1),
            level_max: Decimal::new(40, 1),
            max_players,
            status: "open".into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_room_counts_creator() {
        let game = sample(4);
        assert!(game.has_room_for_another(0));
        assert!(game.has_room_for_another(2));
        assert!(!game.has_room_for_another(3));

        let singles = sample(2);
        assert!(singles.has_room_for_another(0));
        assert!(!singles.has_room_for_another(1));
    }

    #[test]
    fn test_new_match_validation() {
        let today = chrono::Utc::now().date_naive();
        let mut req = NewMatch {
            venue_id: None,
            date: today,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            level_min: None,
            level_max: None,
            max_players: None,
            description: None,
        };
        assert!(req.validate(today).is_ok());
        assert_eq!(req.max_players(), 4);

        req.max_players = Some(3);
        assert!(req.validate(today).is_err());

        req.max_players = Some(2);
        req.level_min = Some(Decimal::new(5, 0));
        req.level_max = Some(Decimal::new(3, 0));
        assert!(req.validate(today).is_err());

        req.level_max = None;
        req.date = today.pred_opt().unwrap();
        assert!(req.validate(today).is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(MatchStatus::from_str("FULL"), Ok(MatchStatus::Full));
        assert!(MatchStatus::Open.is_cancellable());
        assert!(!MatchStatus::Cancelled.is_cancellable());
        assert_eq!(RequestStatus::Accepted.as_str(), "accepted");
    }
}
