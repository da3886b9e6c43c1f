//! Domain models for the padel backend.
//!
//! This module contains all database-backed models representing
//! the core entities of the booking platform, plus the request payloads
//! repositories accept.

pub mod booking;
pub mod catalog;
pub mod chat;
pub mod coaching;
pub mod notification;
pub mod offer;
pub mod padel_match;
pub mod store;
pub mod user;
pub mod venue;

// Re-export all models for convenient access
pub use booking::{Booking, BookingStatus, BookingStatusLabel, NewBooking};
pub use catalog::{
    Category, CategoryKind, GlobalConfig, NewCategory, NewSponsor, NewSport, NewStory, Sponsor,
    Sport, Story, UpdateSponsor, UpdateStory,
};
pub use chat::{Chat, Message};
pub use coaching::{Coach, NewCoach, NewPackage, Package, UpdateCoach, UpdatePackage};
pub use notification::{Notification, NotificationKind};
pub use offer::{NewOffer, Offer, UpdateOffer};
pub use padel_match::{Match, MatchRequest, MatchStatus, NewMatch, RequestStatus};
pub use store::{NewProduct, Order, OrderItem, OrderLine, OrderStatus, OrderWithItems, Product, UpdateProduct};
pub use user::{NewUser, UpdateUser, User, UserRole};
pub use venue::{Branch, NewBranch, NewVenue, UpdateBranch, UpdateVenue, Venue, VenueFilter};

use serde::Deserialize;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: i64 = 20;
/// Upper bound for any single page
pub const MAX_LIMIT: i64 = 100;

/// `limit`/`offset` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        let page = Pagination::default();
        assert_eq!(page.limit(), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);

        let page = Pagination::new(1000, -5);
        assert_eq!(page.limit(), MAX_LIMIT);
        assert_eq!(page.offset(), 0);

        let page = Pagination::new(0, 40);
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 40);
    }
}
