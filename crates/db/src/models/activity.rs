//! Activity log entity models and DTOs.

use bentahan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `activity_log` table.
///
/// Doubles as the settlement idempotency fence: an entry carrying one of
/// the settlement labels means the listing has already been settled.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub listing_id: DbId,
    pub actor_id: Option<DbId>,
    pub actor_name: String,
    pub action: String,
    pub details: String,
    pub is_system: bool,
    pub created_at: Timestamp,
}

/// DTO for appending an activity entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivityEntry {
    pub listing_id: DbId,
    pub actor_id: Option<DbId>,
    pub actor_name: String,
    pub action: String,
    pub details: String,
    pub is_system: bool,
}
