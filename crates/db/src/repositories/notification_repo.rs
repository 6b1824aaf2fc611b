//! Repository for the `notifications` table.

use bentahan_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::{NewNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, recipient_id, title, body, event_type, listing_id, payload, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification, returning the generated ID.
    pub async fn create(pool: &PgPool, new: &NewNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications \
             (recipient_id, title, body, event_type, listing_id, payload) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(new.recipient_id)
        .bind(&new.title)
        .bind(&new.body)
        .bind(&new.event_type)
        .bind(new.listing_id)
        .bind(&new.payload)
        .fetch_one(pool)
        .await
    }

    /// Most recent notification for (recipient, event type, listing)
    /// created at or after `since`, if any. Backs the duplicate check.
    pub async fn find_recent(
        pool: &PgPool,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM notifications \
             WHERE recipient_id = $1 AND event_type = $2 AND listing_id = $3 \
               AND created_at >= $4 \
             ORDER BY created_at DESC \
             LIMIT 1",
        )
        .bind(recipient_id)
        .bind(event_type)
        .bind(listing_id)
        .bind(since)
        .fetch_optional(pool)
        .await
    }

    /// List notifications for a recipient, newest first.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_id: DbId,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .fetch_all(pool)
            .await
    }
}
