//! Capability traits for the externally-owned stores.
//!
//! The engine consumes the listing store, the append-only action and view
//! logs, the notification sink, the activity log, and the payment-timeout
//! collaborator as opaque async capabilities. Production wires the
//! PostgreSQL implementations from [`crate::pg`]; tests wire in-memory
//! doubles. The stores are shared and multi-writer — nothing here assumes
//! exclusive access, which is why the mutating operations re-validate
//! server-side.

use std::sync::Arc;

use async_trait::async_trait;
use bentahan_core::action::ActionKind;
use bentahan_core::types::{DbId, Timestamp};
use bentahan_core::winner::Winner;
use bentahan_db::models::activity::NewActivityEntry;
use bentahan_db::models::listing::Listing;
use bentahan_db::models::listing_action::ListingAction;
use bentahan_db::models::notification::NewNotification;

/// Error type shared by all store capabilities.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database store failure.
    #[error("Store error: {0}")]
    Other(String),
}

/// Listing records: the only store the engine mutates.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// All listings currently in `active` status.
    async fn list_active(&self) -> Result<Vec<Listing>, StoreError>;

    /// Fetch a listing's current record.
    async fn get(&self, id: DbId) -> Result<Option<Listing>, StoreError>;

    /// Transition a listing to `expired` carrying the resolved winner.
    ///
    /// Guarded compare-and-set: returns `false` when no row transitioned
    /// because the listing was locked, sold, or settled concurrently.
    async fn settle_with_winner(
        &self,
        id: DbId,
        winner: &Winner,
        expired_at: Timestamp,
    ) -> Result<bool, StoreError>;

    /// Transition a listing to `expired` with no winner. Same guard.
    async fn settle_no_winner(&self, id: DbId, expired_at: Timestamp)
        -> Result<bool, StoreError>;
}

/// Append-only record of Mine/Steal/Lock/Bid actions per listing.
#[async_trait]
pub trait ActionLog: Send + Sync {
    /// All recorded actions for a listing, oldest first.
    async fn for_listing(&self, listing_id: DbId) -> Result<Vec<ListingAction>, StoreError>;

    /// Distinct actor IDs across a listing's actions.
    async fn distinct_actors(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError>;

    /// Whether a lock action was recorded for the listing at or after
    /// `since`.
    async fn lock_action_since(
        &self,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<bool, StoreError>;
}

/// Who looked at a listing while it was active.
#[async_trait]
pub trait ViewLog: Send + Sync {
    /// Distinct viewer IDs for a listing.
    async fn distinct_viewers(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError>;
}

/// Notification creation plus the duplicate lookup backing idempotent
/// fan-out.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Most recent notification for (recipient, event type, listing)
    /// created at or after `since`, if any.
    async fn find_recent(
        &self,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<Option<DbId>, StoreError>;

    /// Persist a notification, returning its ID.
    async fn create(&self, notification: &NewNotification) -> Result<DbId, StoreError>;
}

/// Durable per-listing audit trail; settlement entries double as the
/// engine's idempotency fence.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Whether a settlement entry already exists for the listing.
    async fn has_settlement_entry(&self, listing_id: DbId) -> Result<bool, StoreError>;

    /// Append an entry, returning its ID.
    async fn record(&self, entry: &NewActivityEntry) -> Result<DbId, StoreError>;
}

/// External payment collaborator. The engine only starts the countdown.
#[async_trait]
pub trait PaymentTimeouts: Send + Sync {
    /// Start the payment countdown for a settled winner.
    async fn start(
        &self,
        listing_id: DbId,
        winner_id: DbId,
        action: ActionKind,
        amount: f64,
    ) -> Result<(), StoreError>;
}

/// Bundle of capabilities handed to the reconciler and the fan-out.
#[derive(Clone)]
pub struct Stores {
    pub listings: Arc<dyn ListingStore>,
    pub actions: Arc<dyn ActionLog>,
    pub views: Arc<dyn ViewLog>,
    pub notifications: Arc<dyn NotificationSink>,
    pub activity: Arc<dyn ActivityLog>,
    pub payments: Arc<dyn PaymentTimeouts>,
}
