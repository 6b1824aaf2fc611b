//! Repository for the append-only `listing_actions` table.

use bentahan_core::action::KIND_LOCK;
use bentahan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::listing_action::{ListingAction, NewListingAction};

/// Column list for `listing_actions` queries.
const COLUMNS: &str = "id, listing_id, actor_id, actor_name, kind, details, created_at";

/// Provides operations for listing actions. Rows are never updated or
/// deleted.
pub struct ListingActionRepo;

impl ListingActionRepo {
    /// Record an action, returning the generated ID.
    pub async fn create(pool: &PgPool, new: &NewListingAction) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO listing_actions (listing_id, actor_id, actor_name, kind, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(new.listing_id)
        .bind(new.actor_id)
        .bind(&new.actor_name)
        .bind(&new.kind)
        .bind(&new.details)
        .fetch_one(pool)
        .await
    }

    /// All actions for a listing, oldest first.
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<ListingAction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listing_actions \
             WHERE listing_id = $1 \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, ListingAction>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct actor IDs across a listing's actions.
    pub async fn distinct_actors(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT actor_id FROM listing_actions \
             WHERE listing_id = $1 AND actor_id IS NOT NULL",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await
    }

    /// Whether a lock action was recorded for the listing at or after
    /// `since`.
    pub async fn has_lock_action_since(
        pool: &PgPool,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM listing_actions \
             WHERE listing_id = $1 AND kind = $2 AND created_at >= $3",
        )
        .bind(listing_id)
        .bind(KIND_LOCK)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0) > 0)
    }
}
