//! Repository for the `listing_views` table.

use bentahan_core::types::DbId;
use sqlx::PgPool;

/// Provides operations for listing view records.
pub struct ListingViewRepo;

impl ListingViewRepo {
    /// Record that a user viewed a listing, returning the generated ID.
    pub async fn create(
        pool: &PgPool,
        listing_id: DbId,
        viewer_id: DbId,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO listing_views (listing_id, viewer_id) \
             VALUES ($1, $2) \
             RETURNING id",
        )
        .bind(listing_id)
        .bind(viewer_id)
        .fetch_one(pool)
        .await
    }

    /// Distinct viewer IDs for a listing.
    pub async fn distinct_viewers(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT viewer_id FROM listing_views WHERE listing_id = $1",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await
    }
}
