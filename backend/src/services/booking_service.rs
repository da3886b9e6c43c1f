use crate::auth::AuthUser;
use crate::error::{option_to_result, AppError, AppResult};
use crate::models::booking::{quote_price, validate_slot};
use crate::models::{Booking, BookingStatus, NewBooking, NotificationKind, Pagination};
use crate::repositories::{BookingDraft, BookingRepository, OfferRepository, VenueRepository};
use crate::services::NotificationService;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// A booked interval as shown in availability
#[derive(Debug, Clone, Serialize)]
pub struct BookedSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
}

/// Booked intervals of one court on one date
#[derive(Debug, Clone, Serialize)]
pub struct CourtAvailability {
    pub court: i32,
    pub booked: Vec<BookedSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueAvailability {
    pub venue_id: Uuid,
    pub date: NaiveDate,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub courts: Vec<CourtAvailability>,
}

/// Service for court reservations
pub struct BookingService {
    booking_repo: Arc<BookingRepository>,
    venue_repo: Arc<VenueRepository>,
    offer_repo: Arc<OfferRepository>,
    notifications: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        venue_repo: Arc<VenueRepository>,
        offer_repo: Arc<OfferRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            booking_repo,
            venue_repo,
            offer_repo,
            notifications,
        }
    }

    /// Validate, price and insert a booking for `user`
    pub async fn create_booking(&self, user: &AuthUser, req: NewBooking, today: NaiveDate) -> AppResult<Booking> {
        info!(
            "Creating booking: user={}, venue={}, court={}, {} {}-{}",
            user.id, req.venue_id, req.court, req.date, req.start_time, req.end_time
        );

        let minutes = validate_slot(req.start_time, req.end_time).map_err(AppError::Validation)?;
        if req.date < today {
            return Err(AppError::Validation("Booking date cannot be in the past".into()));
        }

        let venue = self
            .venue_repo
            .find_by_id(req.venue_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".into()))?;

        if !venue.is_active {
            return Err(AppError::Validation("Venue is not accepting bookings".into()));
        }
        if !venue.has_court(req.court) {
            return Err(AppError::Validation(format!(
                "Court must be between 1 and {}",
                venue.courts
            )));
        }
        if !venue.is_open_between(req.start_time, req.end_time) {
            return Err(AppError::Validation(format!(
                "Venue is open from {} to {}",
                venue.open_time.format("%H:%M"),
                venue.close_time.format("%H:%M")
            )));
        }

        let offer = match req.offer_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(
                self.offer_repo
                    .find_active_by_code(code, venue.id, req.date)
                    .await?
                    .ok_or_else(|| AppError::Validation(format!("Offer code '{}' is not valid", code)))?,
            ),
            None => None,
        };

        let total_price = quote_price(
            venue.price_per_hour,
            minutes,
            offer.as_ref().map(|o| o.discount_percent),
        );

        let draft = BookingDraft {
            user_id: user.id,
            venue_id: venue.id,
            court: req.court,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            total_price,
            offer_id: offer.as_ref().map(|o| o.id),
            notes: req.notes,
        };

        let booking = self.booking_repo.create_checked(&draft).await.map_err(|e| {
            warn!("Booking rejected for user {}: {}", user.id, e);
            AppError::from(e)
        })?;

        info!("Created booking {} ({} total)", booking.id, booking.total_price);

        self.notifications
            .notify(
                user.id,
                NotificationKind::Booking,
                "Booking received",
                &format!(
                    "{} court {} on {} at {}",
                    venue.name,
                    booking.court,
                    booking.date,
                    booking.start_time.format("%H:%M")
                ),
            )
            .await;

        Ok(booking)
    }

    /// Fetch a booking visible to `user`
    pub async fn get(&self, user: &AuthUser, id: Uuid) -> AppResult<Booking> {
        let booking = option_to_result(self.booking_repo.find_by_id(id).await?, "Booking not found")?;
        user.require_owner_or_admin(booking.user_id)?;
        Ok(booking)
    }

    pub async fn list_mine(&self, user: &AuthUser, page: Pagination) -> AppResult<Vec<Booking>> {
        Ok(self.booking_repo.list_by_user(user.id, page).await?)
    }

    /// Cancel as the owner or an admin
    pub async fn cancel(&self, user: &AuthUser, id: Uuid) -> AppResult<Booking> {
        let booking = self.get(user, id).await?;
        let booking = self.apply_transition(booking, BookingStatus::Cancelled).await?;
        info!("Booking {} cancelled by {}", booking.id, user.id);
        Ok(booking)
    }

    /// Admin status change following the booking lifecycle
    pub async fn update_status(&self, id: Uuid, next: BookingStatus) -> AppResult<Booking> {
        let booking = option_to_result(self.booking_repo.find_by_id(id).await?, "Booking not found")?;

        let booking = self.apply_transition(booking, next).await?;
        info!("Booking {} moved to {}", booking.id, booking.status);

        if next == BookingStatus::Confirmed {
            self.notifications
                .notify(
                    booking.user_id,
                    NotificationKind::Booking,
                    "Booking confirmed",
                    &format!(
                        "Court {} on {} at {} is confirmed",
                        booking.court,
                        booking.date,
                        booking.start_time.format("%H:%M")
                    ),
                )
                .await;
        }

        Ok(booking)
    }

    async fn apply_transition(&self, booking: Booking, next: BookingStatus) -> AppResult<Booking> {
        let current = booking.status_enum();
        if !current.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot change booking from {} to {}",
                current.as_str(),
                next.as_str()
            )));
        }

        // The row may have moved on since it was read
        self.booking_repo
            .transition_status(booking.id, current, next)
            .await?
            .ok_or_else(|| AppError::Conflict("Booking was modified concurrently, retry".into()))
    }

    /// Booked intervals per court for a venue on `date`
    pub async fn availability(&self, venue_id: Uuid, date: NaiveDate) -> AppResult<VenueAvailability> {
        let venue = self
            .venue_repo
            .find_by_id(venue_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Venue not found".into()))?;

        let bookings = self.booking_repo.list_by_venue_and_date(venue_id, date).await?;

        let courts = (1..=venue.courts)
            .map(|court| CourtAvailability {
                court,
                booked: bookings
                    .iter()
                    .filter(|b| b.court == court)
                    .map(|b| BookedSlot {
                        start_time: b.start_time,
                        end_time: b.end_time,
                        status: b.status.clone(),
                    })
                    .collect(),
            })
            .collect();

        Ok(VenueAvailability {
            venue_id,
            date,
            open_time: venue.open_time,
            close_time: venue.close_time,
            courts,
        })
    }
}
