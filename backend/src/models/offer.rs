use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Discount code applied at booking time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Offer {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub discount_percent: i32,
    pub venue_id: Option<Uuid>, // None applies to every venue
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Offer {
    pub fn applies_to(&self, venue_id: Uuid, date: NaiveDate) -> bool {
        self.is_active
            && date >= self.valid_from
            && date <= self.valid_to
            && self.venue_id.map_or(true, |v| v == venue_id)
    }
}

/// Codes are matched case-insensitively and stored upper-case
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOffer {
    pub title: String,
    pub code: String,
    pub discount_percent: i32,
    pub venue_id: Option<Uuid>,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

impl NewOffer {
    pub fn validate(&self) -> Result<(), String> {
        if normalize_code(&self.code).is_empty() {
            return Err("Offer code is required".to_string());
        }
        if !(1..=100).contains(&self.discount_percent) {
            return Err("discount_percent must be between 1 and 100".to_string());
        }
        if self.valid_from > self.valid_to {
            return Err("valid_from must not be after valid_to".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOffer {
    pub title: Option<String>,
    pub discount_percent: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_offer_window_and_venue() {
        let venue = Uuid::new_v4();
        let offer = Offer {
            id: Uuid::new_v4(),
            title: "Summer".into(),
            code: "SUMMER".into(),
            discount_percent: 20,
            venue_id: Some(venue),
            valid_from: d(2026, 6, 1),
            valid_to: d(2026, 8, 31),
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
        };

        assert!(offer.applies_to(venue, d(2026, 6, 1)));
        assert!(offer.applies_to(venue, d(2026, 8, 31)));
        assert!(!offer.applies_to(venue, d(2026, 9, 1)));
        assert!(!offer.applies_to(Uuid::new_v4(), d(2026, 7, 1)));

        let global = Offer {
            venue_id: None,
            ..offer
        };
        assert!(global.applies_to(Uuid::new_v4(), d(2026, 7, 1)));
    }

    #[test]
    fn test_new_offer_validation() {
        let offer = NewOffer {
            title: "Launch".into(),
            code: " launch10 ".into(),
            discount_percent: 10,
            venue_id: None,
            valid_from: d(2026, 1, 1),
            valid_to: d(2026, 1, 31),
        };
        assert!(offer.validate().is_ok());
        assert_eq!(normalize_code(&offer.code), "LAUNCH10");

        let too_much = NewOffer {
            discount_percent: 101,
            ..offer.clone()
        };
        assert!(too_much.validate().is_err());

        let backwards = NewOffer {
            valid_from: d(2026, 2, 1),
            ..offer
        };
        assert!(backwards.validate().is_err());
    }
}
