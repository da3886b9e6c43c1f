use crate::error::RepositoryError;
use crate::models::{Booking, BookingStatus, BookingStatusLabel, Pagination};
use crate::repositories::VenueRepository;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, user_id, venue_id, court, date, start_time, end_time, status, \
     total_price, offer_id, notes, created_at, updated_at";

/// Fully priced booking ready to be inserted
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub court: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price: Decimal,
    pub offer_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Admin listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub venue_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Repository for booking data access
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new BookingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking unless it collides with a live booking on the same court.
    ///
    /// The venue row is locked first, so two concurrent requests for the same
    /// venue run their conflict check one after the other.
    pub async fn create_checked(&self, draft: &BookingDraft) -> Result<Booking, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        VenueRepository::lock_for_update(&mut tx, draft.venue_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Venue not found".to_string()))?;

        let conflicts = Self::find_conflicts(
            &mut tx,
            draft.venue_id,
            draft.court,
            draft.date,
            draft.start_time,
            draft.end_time,
        )
        .await?;

        if let Some(existing) = conflicts.first() {
            return Err(RepositoryError::BusinessRule(format!(
                "Court {} is already booked from {} to {}",
                existing.court,
                existing.start_time.format("%H:%M"),
                existing.end_time.format("%H:%M")
            )));
        }

        let sql = format!(
            r#"
            INSERT INTO bookings (user_id, venue_id, court, date, start_time, end_time,
                                  status, total_price, offer_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(draft.user_id)
            .bind(draft.venue_id)
            .bind(draft.court)
            .bind(draft.date)
            .bind(draft.start_time)
            .bind(draft.end_time)
            .bind(BookingStatus::Pending.as_str())
            .bind(draft.total_price)
            .bind(draft.offer_id)
            .bind(&draft.notes)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Live bookings on the court whose `[start, end)` intersects the given one
    pub async fn find_conflicts(
        tx: &mut Transaction<'_, Postgres>,
        venue_id: Uuid,
        court: i32,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE venue_id = $1
              AND court = $2
              AND date = $3
              AND status <> $4
              AND start_time < $6
              AND end_time > $5
            ORDER BY start_time ASC
            "#
        );

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(venue_id)
            .bind(court)
            .bind(date)
            .bind(BookingStatus::Cancelled.as_str())
            .bind(start)
            .bind(end)
            .fetch_all(&mut **tx)
            .await?;
        Ok(bookings)
    }

    /// Find a booking by UUID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    /// A user's bookings, most recent date first
    pub async fn list_by_user(&self, user_id: Uuid, page: Pagination) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE user_id = $1
            ORDER BY date DESC, start_time DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Bookings that still hold a slot at a venue on a date
    pub async fn list_by_venue_and_date(
        &self,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE venue_id = $1 AND date = $2 AND status <> $3
            ORDER BY court ASC, start_time ASC
            "#
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(venue_id)
            .bind(date)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Admin listing
    pub async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let page = Pagination {
            limit: filter.limit,
            offset: filter.offset,
        };
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE ($1::UUID IS NULL OR venue_id = $1)
              AND ($2::DATE IS NULL OR date = $2)
              AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY date DESC, start_time DESC
            LIMIT $4 OFFSET $5
            "#
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(filter.venue_id)
            .bind(filter.date)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Move a booking from `from` to `to`.
    ///
    /// Returns `None` when the booking is no longer in `from`, so two admins
    /// racing on the same booking cannot both apply a transition.
    pub async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        );
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    /// Status codes and their display labels
    pub async fn list_status_labels(&self) -> Result<Vec<BookingStatusLabel>, RepositoryError> {
        let labels = sqlx::query_as::<_, BookingStatusLabel>(
            "SELECT code, label, sort_order FROM booking_statuses ORDER BY sort_order ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(labels)
    }

    /// Rename a status label; codes themselves are fixed
    pub async fn update_status_label(
        &self,
        code: BookingStatus,
        label: &str,
    ) -> Result<BookingStatusLabel, RepositoryError> {
        let updated = sqlx::query_as::<_, BookingStatusLabel>(
            r#"
            UPDATE booking_statuses
            SET label = $2
            WHERE code = $1
            RETURNING code, label, sort_order
            "#,
        )
        .bind(code.as_str())
        .bind(label)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }
}
