//! In-memory store doubles and scenario builders shared by the engine's
//! integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use bentahan_core::action::ActionKind;
use bentahan_core::events;
use bentahan_core::listing::STATUS_ACTIVE;
use bentahan_core::types::{DbId, Timestamp};
use bentahan_core::winner::Winner;
use bentahan_db::models::activity::{ActivityEntry, NewActivityEntry};
use bentahan_db::models::listing::Listing;
use bentahan_db::models::listing_action::ListingAction;
use bentahan_db::models::listing_view::ListingView;
use bentahan_db::models::notification::{NewNotification, Notification};
use bentahan_engine::store::{
    ActionLog, ActivityLog, ListingStore, NotificationSink, PaymentTimeouts, StoreError, Stores,
    ViewLog,
};

/// A recorded payment-timeout start call.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentCall {
    pub listing_id: DbId,
    pub winner_id: DbId,
    pub action: ActionKind,
    pub amount: f64,
}

#[derive(Default)]
struct MemoryState {
    listings: Vec<Listing>,
    actions: Vec<ListingAction>,
    views: Vec<ListingView>,
    notifications: Vec<Notification>,
    activity: Vec<ActivityEntry>,
    payment_calls: Vec<PaymentCall>,
    fail_notifications_for: HashSet<DbId>,
    list_active_calls: usize,
    next_id: DbId,
}

impl MemoryState {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// One struct implements every capability, the way the production side
/// shares one pool across all of them.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MemoryState::default()),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store lock poisoned")
    }

    // -----------------------------------------------------------------------
    // Scenario builders
    // -----------------------------------------------------------------------

    /// Add an active listing expiring at `expires_at`, returning its ID.
    pub fn add_listing(&self, seller_id: DbId, title: &str, expires_at: Value) -> DbId {
        let mut state = self.lock();
        let id = state.next_id();
        state.listings.push(Listing {
            id,
            seller_id,
            seller_name: format!("seller-{seller_id}"),
            title: title.to_string(),
            mine_price: 100.0,
            steal_price: 150.0,
            lock_price: 500.0,
            status: STATUS_ACTIVE.to_string(),
            expires_at,
            locked_by: None,
            locked_at: None,
            winner_id: None,
            winner_name: None,
            winner_action: None,
            winner_amount: None,
            expired_at: None,
            created_at: Utc::now() - Duration::days(3),
        });
        id
    }

    /// Add an active listing that expired `hours` hours ago.
    pub fn add_expired_listing(&self, seller_id: DbId, title: &str, hours: i64) -> DbId {
        self.add_listing(seller_id, title, json!(rfc3339_hours_ago(hours)))
    }

    /// Set the lock fields on a listing (a user lock action).
    pub fn lock_listing(&self, listing_id: DbId, user_id: DbId) {
        let mut state = self.lock();
        let listing = state
            .listings
            .iter_mut()
            .find(|l| l.id == listing_id)
            .expect("unknown listing");
        listing.locked_by = Some(user_id);
        listing.locked_at = Some(Utc::now());
    }

    /// Record an action `hours_ago` hours in the past.
    pub fn add_action(
        &self,
        listing_id: DbId,
        actor_id: Option<DbId>,
        actor_name: &str,
        kind: &str,
        details: &str,
        hours_ago: i64,
    ) {
        let mut state = self.lock();
        let id = state.next_id();
        state.actions.push(ListingAction {
            id,
            listing_id,
            actor_id,
            actor_name: actor_name.to_string(),
            kind: kind.to_string(),
            details: details.to_string(),
            created_at: Utc::now() - Duration::hours(hours_ago),
        });
    }

    pub fn add_view(&self, listing_id: DbId, viewer_id: DbId) {
        let mut state = self.lock();
        let id = state.next_id();
        state.views.push(ListingView {
            id,
            listing_id,
            viewer_id,
            viewed_at: Utc::now() - Duration::hours(1),
        });
    }

    /// Pre-insert an activity entry, e.g. a settlement fence left by a
    /// concurrent process.
    pub fn add_activity(&self, listing_id: DbId, action: &str) {
        let mut state = self.lock();
        let id = state.next_id();
        state.activity.push(ActivityEntry {
            id,
            listing_id,
            actor_id: None,
            actor_name: String::new(),
            action: action.to_string(),
            details: String::new(),
            is_system: true,
            created_at: Utc::now(),
        });
    }

    /// Make notification creation fail for the given recipient.
    pub fn fail_notifications_for(&self, recipient_id: DbId) {
        self.lock().fail_notifications_for.insert(recipient_id);
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn listing(&self, id: DbId) -> Listing {
        self.lock()
            .listings
            .iter()
            .find(|l| l.id == id)
            .expect("unknown listing")
            .clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn notifications_for(&self, recipient_id: DbId) -> Vec<Notification> {
        self.lock()
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }

    pub fn activity_for(&self, listing_id: DbId) -> Vec<ActivityEntry> {
        self.lock()
            .activity
            .iter()
            .filter(|a| a.listing_id == listing_id)
            .cloned()
            .collect()
    }

    /// Settlement entries only (the idempotency fence rows).
    pub fn settlement_entries(&self, listing_id: DbId) -> Vec<ActivityEntry> {
        self.activity_for(listing_id)
            .into_iter()
            .filter(|a| events::SETTLEMENT_LABELS.contains(&a.action.as_str()))
            .collect()
    }

    pub fn payment_calls(&self) -> Vec<PaymentCall> {
        self.lock().payment_calls.clone()
    }

    pub fn list_active_calls(&self) -> usize {
        self.lock().list_active_calls
    }
}

/// Wire every capability to the same in-memory store.
pub fn stores(store: &Arc<MemoryStore>) -> Stores {
    Stores {
        listings: store.clone(),
        actions: store.clone(),
        views: store.clone(),
        notifications: store.clone(),
        activity: store.clone(),
        payments: store.clone(),
    }
}

// ---------------------------------------------------------------------------
// Capability implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl ListingStore for MemoryStore {
    async fn list_active(&self) -> Result<Vec<Listing>, StoreError> {
        let mut state = self.lock();
        state.list_active_calls += 1;
        Ok(state
            .listings
            .iter()
            .filter(|l| l.status == STATUS_ACTIVE)
            .cloned()
            .collect())
    }

    async fn get(&self, id: DbId) -> Result<Option<Listing>, StoreError> {
        Ok(self.lock().listings.iter().find(|l| l.id == id).cloned())
    }

    async fn settle_with_winner(
        &self,
        id: DbId,
        winner: &Winner,
        expired_at: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let Some(listing) = state
            .listings
            .iter_mut()
            .find(|l| l.id == id && l.status == STATUS_ACTIVE && l.locked_by.is_none())
        else {
            return Ok(false);
        };
        listing.status = "expired".to_string();
        listing.expired_at = Some(expired_at);
        listing.winner_id = Some(winner.actor_id);
        listing.winner_name = Some(winner.actor_name.clone());
        listing.winner_action = Some(winner.kind.as_str().to_string());
        listing.winner_amount = Some(winner.amount);
        Ok(true)
    }

    async fn settle_no_winner(
        &self,
        id: DbId,
        expired_at: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let Some(listing) = state
            .listings
            .iter_mut()
            .find(|l| l.id == id && l.status == STATUS_ACTIVE && l.locked_by.is_none())
        else {
            return Ok(false);
        };
        listing.status = "expired".to_string();
        listing.expired_at = Some(expired_at);
        Ok(true)
    }
}

#[async_trait]
impl ActionLog for MemoryStore {
    async fn for_listing(&self, listing_id: DbId) -> Result<Vec<ListingAction>, StoreError> {
        let mut actions: Vec<ListingAction> = self
            .lock()
            .actions
            .iter()
            .filter(|a| a.listing_id == listing_id)
            .cloned()
            .collect();
        actions.sort_by_key(|a| a.created_at);
        Ok(actions)
    }

    async fn distinct_actors(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let mut actors: Vec<DbId> = self
            .lock()
            .actions
            .iter()
            .filter(|a| a.listing_id == listing_id)
            .filter_map(|a| a.actor_id)
            .collect();
        actors.sort_unstable();
        actors.dedup();
        Ok(actors)
    }

    async fn lock_action_since(
        &self,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<bool, StoreError> {
        Ok(self.lock().actions.iter().any(|a| {
            a.listing_id == listing_id && a.kind == "lock" && a.created_at >= since
        }))
    }
}

#[async_trait]
impl ViewLog for MemoryStore {
    async fn distinct_viewers(&self, listing_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let mut viewers: Vec<DbId> = self
            .lock()
            .views
            .iter()
            .filter(|v| v.listing_id == listing_id)
            .map(|v| v.viewer_id)
            .collect();
        viewers.sort_unstable();
        viewers.dedup();
        Ok(viewers)
    }
}

#[async_trait]
impl NotificationSink for MemoryStore {
    async fn find_recent(
        &self,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        since: Timestamp,
    ) -> Result<Option<DbId>, StoreError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .filter(|n| {
                n.recipient_id == recipient_id
                    && n.event_type == event_type
                    && n.listing_id == Some(listing_id)
                    && n.created_at >= since
            })
            .max_by_key(|n| n.created_at)
            .map(|n| n.id))
    }

    async fn create(&self, notification: &NewNotification) -> Result<DbId, StoreError> {
        let mut state = self.lock();
        if state
            .fail_notifications_for
            .contains(&notification.recipient_id)
        {
            return Err(StoreError::Other(format!(
                "injected failure for recipient {}",
                notification.recipient_id
            )));
        }
        let id = state.next_id();
        state.notifications.push(Notification {
            id,
            recipient_id: notification.recipient_id,
            title: notification.title.clone(),
            body: notification.body.clone(),
            event_type: notification.event_type.clone(),
            listing_id: notification.listing_id,
            payload: notification.payload.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl ActivityLog for MemoryStore {
    async fn has_settlement_entry(&self, listing_id: DbId) -> Result<bool, StoreError> {
        Ok(self.lock().activity.iter().any(|a| {
            a.listing_id == listing_id && events::SETTLEMENT_LABELS.contains(&a.action.as_str())
        }))
    }

    async fn record(&self, entry: &NewActivityEntry) -> Result<DbId, StoreError> {
        let mut state = self.lock();
        let id = state.next_id();
        state.activity.push(ActivityEntry {
            id,
            listing_id: entry.listing_id,
            actor_id: entry.actor_id,
            actor_name: entry.actor_name.clone(),
            action: entry.action.clone(),
            details: entry.details.clone(),
            is_system: entry.is_system,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl PaymentTimeouts for MemoryStore {
    async fn start(
        &self,
        listing_id: DbId,
        winner_id: DbId,
        action: ActionKind,
        amount: f64,
    ) -> Result<(), StoreError> {
        self.lock().payment_calls.push(PaymentCall {
            listing_id,
            winner_id,
            action,
            amount,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// RFC 3339 string for an instant `hours` hours in the past.
pub fn rfc3339_hours_ago(hours: i64) -> String {
    (Utc::now() - Duration::hours(hours)).to_rfc3339()
}
