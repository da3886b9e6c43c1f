use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Coach profile attached to a user with the coach role
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coach {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    pub rating: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCoach {
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCoach {
    pub bio: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub rating: Option<Decimal>,
}

/// Paid bundle of training sessions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Package {
    pub id: Uuid,
    pub coach_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub sessions: i32,
    pub price: Decimal,
    pub duration_days: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPackage {
    pub title: String,
    pub description: Option<String>,
    pub sessions: i32,
    pub price: Decimal,
    pub duration_days: Option<i32>,
}

impl NewPackage {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Package title is required".to_string());
        }
        if self.sessions < 1 {
            return Err("A package needs at least one session".to_string());
        }
        if self.price < Decimal::ZERO {
            return Err("Package price cannot be negative".to_string());
        }
        if matches!(self.duration_days, Some(d) if d < 1) {
            return Err("duration_days must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePackage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sessions: Option<i32>,
    pub price: Option<Decimal>,
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_package_validation() {
        let package = NewPackage {
            title: "Beginner pack".into(),
            description: None,
            sessions: 5,
            price: Decimal::new(10000, 2),
            duration_days: None,
        };
        assert!(package.validate().is_ok());

        let empty = NewPackage {
            sessions: 0,
            ..package.clone()
        };
        assert!(empty.validate().is_err());

        let negative = NewPackage {
            price: Decimal::new(-1, 0),
            ..package
        };
        assert!(negative.validate().is_err());
    }
}
