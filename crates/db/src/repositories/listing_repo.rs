//! Repository for the `listings` table.

use bentahan_core::listing::{STATUS_ACTIVE, STATUS_EXPIRED};
use bentahan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::listing::{Listing, NewListing};

/// Column list for `listings` queries.
const COLUMNS: &str = "id, seller_id, seller_name, title, mine_price, steal_price, lock_price, \
                       status, expires_at, locked_by, locked_at, winner_id, winner_name, \
                       winner_action, winner_amount, expired_at, created_at";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Create a listing in `active` status, returning the generated ID.
    pub async fn create(pool: &PgPool, new: &NewListing) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO listings \
             (seller_id, seller_name, title, mine_price, steal_price, lock_price, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(new.seller_id)
        .bind(&new.seller_name)
        .bind(&new.title)
        .bind(new.mine_price)
        .bind(new.steal_price)
        .bind(new.lock_price)
        .bind(&new.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Fetch a listing by ID.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all listings currently in `active` status, oldest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Listing>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM listings WHERE status = $1 ORDER BY created_at");
        sqlx::query_as::<_, Listing>(&query)
            .bind(STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Settle a listing as expired with a winner.
    ///
    /// Guarded compare-and-set: only a row still in `active` status with no
    /// lock holder transitions. Returns `true` if the row transitioned,
    /// `false` if a concurrent lock, sale, or settlement got there first.
    #[allow(clippy::too_many_arguments)]
    pub async fn settle_with_winner(
        pool: &PgPool,
        id: DbId,
        winner_id: DbId,
        winner_name: &str,
        winner_action: &str,
        winner_amount: f64,
        expired_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings \
             SET status = $2, expired_at = $3, winner_id = $4, winner_name = $5, \
                 winner_action = $6, winner_amount = $7 \
             WHERE id = $1 AND status = $8 AND locked_by IS NULL",
        )
        .bind(id)
        .bind(STATUS_EXPIRED)
        .bind(expired_at)
        .bind(winner_id)
        .bind(winner_name)
        .bind(winner_action)
        .bind(winner_amount)
        .bind(STATUS_ACTIVE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Settle a listing as expired with no winner. Same guard as
    /// [`settle_with_winner`](Self::settle_with_winner).
    pub async fn settle_no_winner(
        pool: &PgPool,
        id: DbId,
        expired_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings \
             SET status = $2, expired_at = $3 \
             WHERE id = $1 AND status = $4 AND locked_by IS NULL",
        )
        .bind(id)
        .bind(STATUS_EXPIRED)
        .bind(expired_at)
        .bind(STATUS_ACTIVE)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
