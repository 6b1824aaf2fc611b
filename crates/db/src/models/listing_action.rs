//! Listing action entity models and DTOs.

use bentahan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `listing_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingAction {
    pub id: DbId,
    pub listing_id: DbId,
    pub actor_id: Option<DbId>,
    pub actor_name: String,
    pub kind: String,
    /// Currency-prefixed amount string, e.g. `"₱1,500.00"`.
    pub details: String,
    pub created_at: Timestamp,
}

/// DTO for recording an action.
#[derive(Debug, Deserialize)]
pub struct NewListingAction {
    pub listing_id: DbId,
    pub actor_id: Option<DbId>,
    pub actor_name: String,
    pub kind: String,
    pub details: String,
}
