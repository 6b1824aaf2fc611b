//! Listing view entity model.

use bentahan_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `listing_views` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingView {
    pub id: DbId,
    pub listing_id: DbId,
    pub viewer_id: DbId,
    pub viewed_at: Timestamp,
}
