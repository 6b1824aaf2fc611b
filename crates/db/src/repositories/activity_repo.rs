//! Repository for the `activity_log` table.

use bentahan_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{ActivityEntry, NewActivityEntry};

/// Column list for `activity_log` queries.
const COLUMNS: &str =
    "id, listing_id, actor_id, actor_name, action, details, is_system, created_at";

/// Provides operations for activity log entries.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append an entry, returning the generated ID.
    pub async fn create(pool: &PgPool, new: &NewActivityEntry) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_log \
             (listing_id, actor_id, actor_name, action, details, is_system) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(new.listing_id)
        .bind(new.actor_id)
        .bind(&new.actor_name)
        .bind(&new.action)
        .bind(&new.details)
        .bind(new.is_system)
        .fetch_one(pool)
        .await
    }

    /// Whether the listing has an entry with any of the given action labels.
    pub async fn has_any_action(
        pool: &PgPool,
        listing_id: DbId,
        actions: &[&str],
    ) -> Result<bool, sqlx::Error> {
        let actions: Vec<String> = actions.iter().map(|s| s.to_string()).collect();
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activity_log \
             WHERE listing_id = $1 AND action = ANY($2)",
        )
        .bind(listing_id)
        .bind(&actions)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// All entries for a listing, oldest first.
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_log \
             WHERE listing_id = $1 \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }
}
