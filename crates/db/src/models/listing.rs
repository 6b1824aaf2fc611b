//! Listing entity models and DTOs.

use bentahan_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `listings` table.
///
/// `status` is the raw column value; parse it with
/// [`ListingStatus::from_str`](bentahan_core::ListingStatus::from_str)
/// before acting on it. `expires_at` carries the heterogeneous legacy
/// representations and is canonicalized via `bentahan_core::expiry`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub seller_id: DbId,
    pub seller_name: String,
    pub title: String,
    pub mine_price: f64,
    pub steal_price: f64,
    pub lock_price: f64,
    pub status: String,
    pub expires_at: serde_json::Value,
    /// Set only by an explicit user lock action, never by the engine.
    pub locked_by: Option<DbId>,
    pub locked_at: Option<Timestamp>,
    /// Winner fields are written by the engine on settlement.
    pub winner_id: Option<DbId>,
    pub winner_name: Option<String>,
    pub winner_action: Option<String>,
    pub winner_amount: Option<f64>,
    pub expired_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a listing.
#[derive(Debug, Deserialize)]
pub struct NewListing {
    pub seller_id: DbId,
    pub seller_name: String,
    pub title: String,
    pub mine_price: f64,
    pub steal_price: f64,
    pub lock_price: f64,
    pub expires_at: serde_json::Value,
}
