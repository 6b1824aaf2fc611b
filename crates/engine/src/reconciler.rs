//! Expired-listing reconciliation sweep.
//!
//! One sweep settles every listing whose countdown has elapsed: query the
//! active set, canonicalize expiries, filter to the catch-up window,
//! re-read and re-validate each candidate against the store fences, resolve
//! the winner, transition state exactly once, and fan out notifications.
//!
//! Correctness against concurrent processes rests on the store-side fences
//! (guarded status update, activity-log settlement entry, notification
//! dedup windows), not on in-memory locking. The process-local in-flight
//! flag only stops one process from overlapping its own sweeps.

use std::sync::atomic::{AtomicBool, Ordering};

use bentahan_core::action::ActionKind;
use bentahan_core::listing::transitions;
use bentahan_core::types::{DbId, Timestamp};
use bentahan_core::winner::Winner;
use bentahan_core::{events, expiry, winner, ActionRecord, ListingStatus};
use bentahan_db::models::activity::NewActivityEntry;
use bentahan_db::models::listing::Listing;
use bentahan_db::models::listing_action::ListingAction;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::cache::HandledCache;
use crate::config::EngineConfig;
use crate::fanout::NotificationFanout;
use crate::store::{StoreError, Stores};

/// Outcome counters for one completed sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Active listings returned by the store.
    pub scanned: usize,
    /// Listings whose expiry fell inside the catch-up window.
    pub candidates: usize,
    pub settled_with_winner: usize,
    pub settled_no_winner: usize,
    /// Candidates skipped by a fence, the cache, or a detected race.
    pub skipped: usize,
    /// Candidates whose processing failed; retried next sweep.
    pub failed: usize,
}

/// Result of requesting a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The sweep ran to completion.
    Completed(SweepReport),
    /// Another sweep was already in flight; the request was dropped.
    AlreadyRunning,
}

enum Settlement {
    Winner,
    NoWinner,
    Skipped,
}

/// Sweep orchestrator.
pub struct Reconciler {
    stores: Stores,
    fanout: NotificationFanout,
    config: EngineConfig,
    handled: Mutex<HandledCache>,
    in_flight: AtomicBool,
}

impl Reconciler {
    pub fn new(stores: Stores, config: EngineConfig) -> Self {
        let fanout = NotificationFanout::new(stores.clone(), config.clone());
        let handled = Mutex::new(HandledCache::new(config.handled_cache_capacity));
        Self {
            stores,
            fanout,
            config,
            handled,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a sweep is currently in flight in this process.
    pub fn sweep_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run one reconciliation sweep.
    ///
    /// At most one sweep runs per process at a time; a request made while
    /// one is in flight is dropped, not queued — the next scheduled tick
    /// retries naturally because settlement is idempotent.
    pub async fn sweep(&self) -> SweepOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SweepOutcome::AlreadyRunning;
        }

        let report = self.run_sweep().await;
        self.in_flight.store(false, Ordering::SeqCst);
        SweepOutcome::Completed(report)
    }

    async fn run_sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = Utc::now();

        let listings = match self.stores.listings.list_active().await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::error!(error = %e, "Failed to query active listings");
                return report;
            }
        };
        report.scanned = listings.len();

        let window_start = now - self.config.catch_up_window;

        for listing in listings {
            let Some(expiry) = expiry::resolve(&listing.expires_at) else {
                tracing::warn!(
                    listing_id = listing.id,
                    "Skipping listing with unparseable expiry"
                );
                report.skipped += 1;
                continue;
            };

            // Not yet expired, or expired so long ago it counts as
            // abandoned: the catch-up window bounds the cost of catch-up.
            if expiry > now || expiry < window_start {
                continue;
            }
            report.candidates += 1;

            if self.handled.lock().await.contains(listing.id) {
                report.skipped += 1;
                continue;
            }
            if listing.locked_by.is_some() || listing.status == ListingStatus::Locked.as_str() {
                report.skipped += 1;
                continue;
            }

            match self.settle_candidate(listing.id, now).await {
                Ok(Settlement::Winner) => {
                    report.settled_with_winner += 1;
                    self.handled.lock().await.insert(listing.id);
                }
                Ok(Settlement::NoWinner) => {
                    report.settled_no_winner += 1;
                    self.handled.lock().await.insert(listing.id);
                }
                Ok(Settlement::Skipped) => report.skipped += 1,
                Err(e) => {
                    tracing::error!(
                        listing_id = listing.id,
                        error = %e,
                        "Failed to settle expired listing"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.candidates > 0 {
            tracing::info!(
                scanned = report.scanned,
                candidates = report.candidates,
                with_winner = report.settled_with_winner,
                no_winner = report.settled_no_winner,
                skipped = report.skipped,
                failed = report.failed,
                "Expiration sweep finished"
            );
        } else {
            tracing::debug!(scanned = report.scanned, "Expiration sweep found no candidates");
        }

        report
    }

    /// Settle one candidate, re-validating every fence against fresh state.
    async fn settle_candidate(
        &self,
        id: DbId,
        now: Timestamp,
    ) -> Result<Settlement, StoreError> {
        // Fresh re-read: the record may have changed since the sweep query.
        let Some(listing) = self.stores.listings.get(id).await? else {
            return Ok(Settlement::Skipped);
        };

        let status = match ListingStatus::from_str(&listing.status) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(listing_id = id, error = %e, "Skipping listing with unknown status");
                return Ok(Settlement::Skipped);
            }
        };
        if !transitions::can_transition(status, ListingStatus::Expired) {
            return Ok(Settlement::Skipped);
        }
        if listing.locked_by.is_some() {
            return Ok(Settlement::Skipped);
        }

        // Authoritative idempotency fence.
        if self.stores.activity.has_settlement_entry(id).await? {
            return Ok(Settlement::Skipped);
        }

        // A recent lock action exempts the listing even if the lock fields
        // were not yet written back to the record.
        if self
            .stores
            .actions
            .lock_action_since(id, now - self.config.catch_up_window)
            .await?
        {
            return Ok(Settlement::Skipped);
        }

        let actions = self.stores.actions.for_listing(id).await?;
        let records: Vec<ActionRecord> = actions.iter().filter_map(to_record).collect();

        match winner::resolve(&records) {
            Some(winner) => self.settle_with_winner(&listing, &winner, now).await,
            None => self.settle_no_winner(&listing, now).await,
        }
    }

    async fn settle_with_winner(
        &self,
        listing: &Listing,
        winner: &Winner,
        now: Timestamp,
    ) -> Result<Settlement, StoreError> {
        if !self
            .stores
            .listings
            .settle_with_winner(listing.id, winner, now)
            .await?
        {
            // Lost the race to a concurrent lock, sale, or settlement.
            tracing::debug!(listing_id = listing.id, "Settlement raced, skipping");
            return Ok(Settlement::Skipped);
        }

        tracing::info!(
            listing_id = listing.id,
            winner_id = winner.actor_id,
            action = winner.kind.as_str(),
            amount = winner.amount,
            "Listing expired with winner"
        );

        // Status is already terminal; everything below is best-effort and
        // individually retried by a later sweep through its own fence.
        self.fanout.expired_with_winner(listing, winner, now).await;
        self.start_payment_timeout(listing.id, winner).await;
        self.record_settlement_entry(listing, Some(winner)).await;

        Ok(Settlement::Winner)
    }

    async fn settle_no_winner(
        &self,
        listing: &Listing,
        now: Timestamp,
    ) -> Result<Settlement, StoreError> {
        if !self.stores.listings.settle_no_winner(listing.id, now).await? {
            tracing::debug!(listing_id = listing.id, "Settlement raced, skipping");
            return Ok(Settlement::Skipped);
        }

        tracing::info!(listing_id = listing.id, "Listing expired with no winner");

        self.fanout.expired_no_winner(listing, now).await;
        self.record_settlement_entry(listing, None).await;

        Ok(Settlement::NoWinner)
    }

    async fn start_payment_timeout(&self, listing_id: DbId, winner: &Winner) {
        if let Err(e) = self
            .stores
            .payments
            .start(listing_id, winner.actor_id, winner.kind, winner.amount)
            .await
        {
            tracing::error!(
                listing_id,
                winner_id = winner.actor_id,
                error = %e,
                "Failed to start payment timeout"
            );
        }
    }

    async fn record_settlement_entry(&self, listing: &Listing, winner: Option<&Winner>) {
        let entry = match winner {
            Some(winner) => NewActivityEntry {
                listing_id: listing.id,
                actor_id: Some(winner.actor_id),
                actor_name: winner.actor_name.clone(),
                action: events::ACTIVITY_EXPIRED_WINNER.to_string(),
                details: format!(
                    "Won by {} ({}) for ₱{:.2}",
                    winner.actor_name,
                    winner.kind.as_str(),
                    winner.amount
                ),
                is_system: true,
            },
            None => NewActivityEntry {
                listing_id: listing.id,
                actor_id: None,
                actor_name: String::new(),
                action: events::ACTIVITY_EXPIRED_NO_WINNER.to_string(),
                details: "Expired without a qualifying claim or bid".to_string(),
                is_system: true,
            },
        };

        if let Err(e) = self.stores.activity.record(&entry).await {
            tracing::error!(
                listing_id = listing.id,
                error = %e,
                "Failed to record settlement activity entry"
            );
        }
    }
}

/// Convert an action row into resolver input, dropping rows whose kind is
/// not one of the four known action kinds.
fn to_record(action: &ListingAction) -> Option<ActionRecord> {
    let kind = ActionKind::from_str(&action.kind).ok()?;
    Some(ActionRecord {
        actor_id: action.actor_id,
        actor_name: action.actor_name.clone(),
        kind,
        details: action.details.clone(),
        created_at: action.created_at,
    })
}
