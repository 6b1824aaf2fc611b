//! PostgreSQL implementations of the store capabilities.
//!
//! Thin adapters delegating to the `bentahan-db` repositories; every
//! capability shares the same connection pool.

use std::sync::Arc;

use async_trait::async_trait;
use bentahan_core::action::ActionKind;
use bentahan_core::events;
use bentahan_core::types::{DbId, Timestamp};
use bentahan_core::winner::Winner;
use bentahan_db::models::activity::NewActivityEntry;
use bentahan_db::models::listing::Listing;
use bentahan_db::models::listing_action::ListingAction;
use bentahan_db::models::notification::NewNotification;
use bentahan_db::repositories::{
    ActivityRepo, ListingActionRepo, ListingRepo, ListingViewRepo, NotificationRepo,
};
use bentahan_db::DbPool;

use crate::store::{
    ActionLog, ActivityLog, ListingStore, NotificationSink, PaymentTimeouts, StoreError, Stores,
    ViewLog,
};

/// PostgreSQL-backed listing store.
#[derive(Clone)]
pub struct PgListingStore {
    pool: DbPool,
}

impl PgListingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn list_active(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(ListingRepo::list_active(&self.pool).await?)
    }

    async fn get(&self, id: DbId) -> Result<Option<Listing>, StoreError> {
        Ok(ListingRepo::get(&self.pool, id).await?)
    }

    async fn settle_with_winner(
        &self,
        id: DbId,
        winner: &Winner,
        expired_at: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(ListingRepo::settle_with_winner(
            &self.pool,
            id,
            winner.actor_id,
            &winner.actor_name,
            winner.kind.as_str(),
            winner.amount,
            expired_at,
        )
        .await?)
    }

    async fn settle_no_winner(
        &self,
        id: DbId,
        expired_at: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(ListingRepo::settle_no_winner(&self.pool, id, expired_at).await?)
    }
}

/// PostgreSQL-backed action log.
#[derive(Clone)]
pub struct PgActionLog {
    pool: DbPool,
}

impl PgActionLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionLog for PgActionLog {
    async fn for_listing(&self, listing_id: DbId) -> Result<Vec<ListingAction>, StoreError> {
        Ok(ListingActionRepo::list_for_listing(&self.pool, listing_id).await?)
    }

    async fn distinct_actors(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError> {
        Ok(ListingActionRepo::distinct_actors(&self.pool, listing_id).await?)
    }

    async fn lock_action_since(
        &self,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(ListingActionRepo::has_lock_action_since(&self.pool, listing_id, since).await?)
    }
}

/// PostgreSQL-backed view log.
#[derive(Clone)]
pub struct PgViewLog {
    pool: DbPool,
}

impl PgViewLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViewLog for PgViewLog {
    async fn distinct_viewers(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError> {
        Ok(ListingViewRepo::distinct_viewers(&self.pool, listing_id).await?)
    }
}

/// PostgreSQL-backed notification sink.
#[derive(Clone)]
pub struct PgNotificationSink {
    pool: DbPool,
}

impl PgNotificationSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn find_recent(
        &self,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<Option<DbId>, StoreError> {
        Ok(
            NotificationRepo::find_recent(&self.pool, recipient_id, event_type, listing_id, since)
                .await?,
        )
    }

    async fn create(&self, notification: &NewNotification) -> Result<DbId, StoreError> {
        Ok(NotificationRepo::create(&self.pool, notification).await?)
    }
}

/// PostgreSQL-backed activity log.
#[derive(Clone)]
pub struct PgActivityLog {
    pool: DbPool,
}

impl PgActivityLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for PgActivityLog {
    async fn has_settlement_entry(&self, listing_id: DbId) -> Result<bool, StoreError> {
        Ok(ActivityRepo::has_any_action(&self.pool, listing_id, events::SETTLEMENT_LABELS).await?)
    }

    async fn record(&self, entry: &NewActivityEntry) -> Result<DbId, StoreError> {
        Ok(ActivityRepo::create(&self.pool, entry).await?)
    }
}

/// Payment-timeout collaborator backed by the activity log.
///
/// Settlement only needs to start the countdown; the payment subsystem
/// consumes the recorded `Payment Window Started` entry.
#[derive(Clone)]
pub struct PgPaymentTimeouts {
    pool: DbPool,
}

impl PgPaymentTimeouts {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentTimeouts for PgPaymentTimeouts {
    async fn start(
        &self,
        listing_id: DbId,
        winner_id: DbId,
        action: ActionKind,
        amount: f64,
    ) -> Result<(), StoreError> {
        tracing::info!(listing_id, winner_id, "Starting payment timeout");
        ActivityRepo::create(
            &self.pool,
            &NewActivityEntry {
                listing_id,
                actor_id: Some(winner_id),
                actor_name: String::new(),
                action: events::ACTIVITY_PAYMENT_WINDOW_STARTED.to_string(),
                details: format!("{} for ₱{amount:.2}", action.as_str()),
                is_system: true,
            },
        )
        .await?;
        Ok(())
    }
}

/// Wire every capability to the same pool.
pub fn pg_stores(pool: DbPool) -> Stores {
    Stores {
        listings: Arc::new(PgListingStore::new(pool.clone())),
        actions: Arc::new(PgActionLog::new(pool.clone())),
        views: Arc::new(PgViewLog::new(pool.clone())),
        notifications: Arc::new(PgNotificationSink::new(pool.clone())),
        activity: Arc::new(PgActivityLog::new(pool.clone())),
        payments: Arc::new(PgPaymentTimeouts::new(pool)),
    }
}
