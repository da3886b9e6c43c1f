use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bookable location with one or more courts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub sport_id: Option<Uuid>,
    pub price_per_hour: Decimal,
    pub courts: i32,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Venue {
    pub fn has_court(&self, court: i32) -> bool {
        court >= 1 && court <= self.courts
    }

    /// Whether `[start, end)` fits inside opening hours
    pub fn is_open_between(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.open_time && end <= self.close_time
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVenue {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub sport_id: Option<Uuid>,
    pub price_per_hour: Decimal,
    pub courts: Option<i32>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub image_url: Option<String>,
}

impl NewVenue {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Venue name is required".to_string());
        }
        if self.address.trim().is_empty() || self.city.trim().is_empty() {
            return Err("Venue address and city are required".to_string());
        }
        if self.price_per_hour <= Decimal::ZERO {
            return Err("price_per_hour must be greater than 0".to_string());
        }
        if matches!(self.courts, Some(c) if c < 1) {
            return Err("A venue needs at least one court".to_string());
        }
        if let (Some(open), Some(close)) = (self.open_time, self.close_time) {
            if open >= close {
                return Err("open_time must be before close_time".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub sport_id: Option<Uuid>,
    pub price_per_hour: Option<Decimal>,
    pub courts: Option<i32>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateVenue {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.price_per_hour, Some(p) if p <= Decimal::ZERO) {
            return Err("price_per_hour must be greater than 0".to_string());
        }
        if matches!(self.courts, Some(c) if c < 1) {
            return Err("A venue needs at least one court".to_string());
        }
        Ok(())
    }
}

/// Query filters for venue listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueFilter {
    pub city: Option<String>,
    pub sport_id: Option<Uuid>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A physical location of a venue brand
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBranch {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBranch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_venue() -> NewVenue {
        NewVenue {
            name: "Club Norte".into(),
            description: None,
            address: "Calle 1".into(),
            city: "Madrid".into(),
            sport_id: None,
            price_per_hour: Decimal::new(2000, 2),
            courts: Some(4),
            open_time: NaiveTime::from_hms_opt(8, 0, 0),
            close_time: NaiveTime::from_hms_opt(22, 0, 0),
            image_url: None,
        }
    }

    #[test]
    fn test_new_venue_validation() {
        assert!(new_venue().validate().is_ok());

        let mut venue = new_venue();
        venue.price_per_hour = Decimal::ZERO;
        assert!(venue.validate().is_err());

        let mut venue = new_venue();
        venue.courts = Some(0);
        assert!(venue.validate().is_err());

        let mut venue = new_venue();
        venue.open_time = NaiveTime::from_hms_opt(23, 0, 0);
        assert!(venue.validate().is_err());
    }
}
