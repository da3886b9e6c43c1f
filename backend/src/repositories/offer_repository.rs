use crate::error::RepositoryError;
use crate::models::offer::normalize_code;
use crate::models::{NewOffer, Offer, UpdateOffer};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

const OFFER_COLUMNS: &str =
    "id, title, code, discount_percent, venue_id, valid_from, valid_to, is_active, created_at";

/// Repository for discount offers
pub struct OfferRepository {
    pool: PgPool,
}

impl OfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, offer: &NewOffer) -> Result<Offer, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO offers (title, code, discount_percent, venue_id, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OFFER_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Offer>(&sql)
            .bind(offer.title.trim())
            .bind(normalize_code(&offer.code))
            .bind(offer.discount_percent)
            .bind(offer.venue_id)
            .bind(offer.valid_from)
            .bind(offer.valid_to)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Offer>, RepositoryError> {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = $1");
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    /// Active offer with `code` valid for the venue on `date`
    pub async fn find_active_by_code(
        &self,
        code: &str,
        venue_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Offer>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {OFFER_COLUMNS}
            FROM offers
            WHERE code = $1
              AND is_active
              AND valid_from <= $3 AND valid_to >= $3
              AND (venue_id IS NULL OR venue_id = $2)
            "#
        );
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(normalize_code(code))
            .bind(venue_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(offer)
    }

    /// Offers that are active and not yet expired on `today`
    pub async fn list_current(&self, today: NaiveDate) -> Result<Vec<Offer>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT {OFFER_COLUMNS}
            FROM offers
            WHERE is_active AND valid_to >= $1
            ORDER BY valid_from ASC
            "#
        );
        let offers = sqlx::query_as::<_, Offer>(&sql)
            .bind(today)
            .fetch_all(&self.pool)
            .await?;
        Ok(offers)
    }

    pub async fn update(&self, id: Uuid, changes: &UpdateOffer) -> Result<Offer, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE offers
            SET title = COALESCE($2, title),
                discount_percent = COALESCE($3, discount_percent),
                valid_from = COALESCE($4, valid_from),
                valid_to = COALESCE($5, valid_to),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING {OFFER_COLUMNS}
            "#
        );
        let offer = sqlx::query_as::<_, Offer>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(changes.discount_percent)
            .bind(changes.valid_from)
            .bind(changes.valid_to)
            .bind(changes.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(offer)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let rows_affected = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
