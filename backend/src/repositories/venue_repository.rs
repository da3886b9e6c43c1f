use crate::error::RepositoryError;
use crate::models::{NewVenue, UpdateVenue, Venue, VenueFilter};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const VENUE_COLUMNS: &str = "id, name, description, address, city, sport_id, price_per_hour, \
     courts, open_time, close_time, image_url, is_active, created_at, updated_at";

/// Repository for venue data access
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    /// Create a new VenueRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new venue
    pub async fn create(&self, venue: &NewVenue) -> Result<Venue, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO venues (name, description, address, city, sport_id, price_per_hour,
                                courts, open_time, close_time, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 1), COALESCE($8, '08:00'::TIME),
                    COALESCE($9, '23:00'::TIME), $10)
            RETURNING {VENUE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Venue>(&sql)
            .bind(venue.name.trim())
            .bind(&venue.description)
            .bind(&venue.address)
            .bind(&venue.city)
            .bind(venue.sport_id)
            .bind(venue.price_per_hour)
            .bind(venue.courts)
            .bind(venue.open_time)
            .bind(venue.close_time)
            .bind(&venue.image_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Find a venue by UUID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Venue>, RepositoryError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1");
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(venue)
    }

    /// Lock a venue row for the rest of `tx`.
    ///
    /// Every booking insert for a venue goes through this lock, which
    /// serializes conflict checks for that venue.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Venue>, RepositoryError> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1 FOR UPDATE");
        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(venue)
    }

    /// List venues matching the filter, ordered by name
    pub async fn list(&self, filter: &VenueFilter) -> Result<Vec<Venue>, RepositoryError> {
        let page = crate::models::Pagination {
            limit: filter.limit,
            offset: filter.offset,
        };
        let sql = format!(
            r#"
            SELECT {VENUE_COLUMNS}
            FROM venues
            WHERE ($1::TEXT IS NULL OR LOWER(city) = LOWER($1))
              AND ($2::UUID IS NULL OR sport_id = $2)
              AND ($3 OR is_active)
            ORDER BY name ASC
            LIMIT $4 OFFSET $5
            "#
        );

        let venues = sqlx::query_as::<_, Venue>(&sql)
            .bind(&filter.city)
            .bind(filter.sport_id)
            .bind(filter.include_inactive)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(venues)
    }

    /// Apply a partial update
    pub async fn update(&self, id: Uuid, changes: &UpdateVenue) -> Result<Venue, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE venues
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                sport_id = COALESCE($6, sport_id),
                price_per_hour = COALESCE($7, price_per_hour),
                courts = COALESCE($8, courts),
                open_time = COALESCE($9, open_time),
                close_time = COALESCE($10, close_time),
                image_url = COALESCE($11, image_url),
                is_active = COALESCE($12, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        );

        let venue = sqlx::query_as::<_, Venue>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.address)
            .bind(&changes.city)
            .bind(changes.sport_id)
            .bind(changes.price_per_hour)
            .bind(changes.courts)
            .bind(changes.open_time)
            .bind(changes.close_time)
            .bind(&changes.image_url)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(venue)
    }

    /// Delete a venue (cascades to branches and bookings)
    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

