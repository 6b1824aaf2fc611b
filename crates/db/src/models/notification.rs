//! Notification entity models and DTOs.

use bentahan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub title: String,
    pub body: String,
    /// Event type also present in `payload.type`; kept as a column so the
    /// duplicate check can filter without unpacking JSON.
    pub event_type: String,
    pub listing_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub recipient_id: DbId,
    pub title: String,
    pub body: String,
    pub event_type: String,
    pub listing_id: Option<DbId>,
    pub payload: serde_json::Value,
}
