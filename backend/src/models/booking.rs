use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bookings are sold in blocks of this many minutes
pub const SLOT_MINUTES: i64 = 30;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Convert from database string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

/// Court reservation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub court: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String, // Stored as TEXT, use BookingStatus enum for type safety
    pub total_price: Decimal,
    pub offer_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn status_enum(&self) -> BookingStatus {
        BookingStatus::from_str(&self.status).unwrap_or(BookingStatus::Pending)
    }
}

/// Booking request payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub venue_id: Uuid,
    pub court: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub offer_code: Option<String>,
    pub notes: Option<String>,
}

/// Display label for a status code, editable by admins
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingStatusLabel {
    pub code: String,
    pub label: String,
    pub sort_order: i32,
}

/// Half-open interval overlap: `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Touching intervals (one ends where the other starts) do not overlap, and an
/// interval that fully contains the other does.
pub fn intervals_overlap(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

/// Check a requested slot and return its length in minutes
pub fn validate_slot(start: NaiveTime, end: NaiveTime) -> Result<i64, String> {
    if end <= start {
        return Err("end_time must be after start_time".to_string());
    }

    let minutes = (end - start).num_minutes();
    if minutes < SLOT_MINUTES {
        return Err(format!("Bookings must be at least {} minutes", SLOT_MINUTES));
    }
    if minutes % SLOT_MINUTES != 0 {
        return Err(format!("Booking length must be a multiple of {} minutes", SLOT_MINUTES));
    }

    Ok(minutes)
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `price_per_hour * minutes / 60` rounded to cents, then less
/// `discount_percent` and rounded to cents again
pub fn quote_price(price_per_hour: Decimal, minutes: i64, discount_percent: Option<i32>) -> Decimal {
    let base = to_cents(price_per_hour * Decimal::from(minutes) / Decimal::from(60));
    match discount_percent {
        Some(pct) => {
            let pct = Decimal::from(pct.clamp(0, 100));
            to_cents(base * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED)
        }
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overlap_partial() {
        assert!(intervals_overlap(t(10, 0), t(11, 0), t(10, 30), t(11, 30)));
        assert!(intervals_overlap(t(10, 30), t(11, 30), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_overlap_containment() {
        // new booking fully contains an existing one
        assert!(intervals_overlap(t(10, 30), t(11, 0), t(10, 0), t(12, 0)));
        assert!(intervals_overlap(t(10, 0), t(12, 0), t(10, 30), t(11, 0)));
        assert!(intervals_overlap(t(10, 0), t(11, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_back_to_back_is_not_overlap() {
        assert!(!intervals_overlap(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!intervals_overlap(t(11, 0), t(12, 0), t(10, 0), t(11, 0)));
        assert!(!intervals_overlap(t(8, 0), t(9, 0), t(18, 0), t(19, 0)));
    }

    #[test]
    fn test_validate_slot() {
        assert_eq!(validate_slot(t(10, 0), t(11, 30)), Ok(90));
        assert!(validate_slot(t(11, 0), t(10, 0)).is_err());
        assert!(validate_slot(t(10, 0), t(10, 0)).is_err());
        assert!(validate_slot(t(10, 0), t(10, 15)).is_err());
        assert!(validate_slot(t(10, 0), t(10, 45)).is_err());
    }

    #[test]
    fn test_quote_price() {
        let hourly = Decimal::new(2000, 2); // 20.00
        assert_eq!(quote_price(hourly, 90, None), Decimal::new(3000, 2));
        assert_eq!(quote_price(hourly, 60, Some(25)), Decimal::new(1500, 2));
        assert_eq!(quote_price(hourly, 60, Some(100)), Decimal::ZERO);

        // 15.50/h for 30 minutes is 7.75
        assert_eq!(quote_price(Decimal::new(1550, 2), 30, None), Decimal::new(775, 2));
        // 7.75 with 10% off is 6.975, rounds to 6.98
        assert_eq!(quote_price(Decimal::new(1550, 2), 30, Some(10)), Decimal::new(698, 2));

        // 10.01/h for 30 minutes is 5.005, billed 5.01; 10% off that is 4.509, billed 4.51
        assert_eq!(quote_price(Decimal::new(1001, 2), 30, None), Decimal::new(501, 2));
        assert_eq!(quote_price(Decimal::new(1001, 2), 30, Some(10)), Decimal::new(451, 2));
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
    }
}
