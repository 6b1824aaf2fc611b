//! Notification fan-out for settlement events.
//!
//! Computes the audience for each settlement outcome and emits one
//! notification per (recipient, event type, listing) tuple. Emission is
//! idempotent within the configured dedup window, and each recipient is
//! isolated: one failed write never blocks the rest of the audience.

use std::collections::BTreeSet;

use bentahan_core::events;
use bentahan_core::types::{DbId, Timestamp};
use bentahan_core::winner::Winner;
use bentahan_db::models::listing::Listing;
use bentahan_db::models::notification::NewNotification;
use serde_json::json;

use crate::config::EngineConfig;
use crate::store::{StoreError, Stores};

/// Counters for one fan-out invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanoutSummary {
    /// Notifications written.
    pub created: usize,
    /// Emissions suppressed by the duplicate check.
    pub deduplicated: usize,
    /// Recipients whose emission failed (logged, not retried this pass).
    pub failed: usize,
}

enum Emitted {
    Created(DbId),
    Existing(DbId),
}

/// Audience computation and idempotent notification emission.
pub struct NotificationFanout {
    stores: Stores,
    config: EngineConfig,
}

impl NotificationFanout {
    pub fn new(stores: Stores, config: EngineConfig) -> Self {
        Self { stores, config }
    }

    /// Fan out for a settlement with a winner: the winner hears "payment
    /// required", the seller hears "winner determined", everyone else who
    /// acted on or viewed the listing hears "expired — you lost".
    pub async fn expired_with_winner(
        &self,
        listing: &Listing,
        winner: &Winner,
        now: Timestamp,
    ) -> FanoutSummary {
        let mut summary = FanoutSummary::default();
        let since = now - self.config.dedup_window;

        let (title, body) = events::payment_required_message(&listing.title, winner.amount);
        let payload = json!({
            "type": events::EVENT_PAYMENT_REQUIRED,
            "listingId": listing.id,
            "action": winner.kind.as_str(),
            "amount": winner.amount,
        });
        self.emit(
            winner.actor_id,
            events::EVENT_PAYMENT_REQUIRED,
            listing.id,
            title,
            body,
            payload,
            since,
            &mut summary,
        )
        .await;

        let (title, body) =
            events::winner_determined_message(&listing.title, &winner.actor_name, winner.amount);
        let payload = json!({
            "type": events::EVENT_WINNER_DETERMINED,
            "listingId": listing.id,
            "winnerId": winner.actor_id,
            "amount": winner.amount,
        });
        self.emit(
            listing.seller_id,
            events::EVENT_WINNER_DETERMINED,
            listing.id,
            title,
            body,
            payload,
            since,
            &mut summary,
        )
        .await;

        match self.other_interested(listing, winner.actor_id).await {
            Ok(others) => {
                for recipient in others {
                    let (title, body) = events::listing_lost_message(&listing.title);
                    let payload = json!({
                        "type": events::EVENT_LISTING_EXPIRED_LOST,
                        "listingId": listing.id,
                    });
                    self.emit(
                        recipient,
                        events::EVENT_LISTING_EXPIRED_LOST,
                        listing.id,
                        title,
                        body,
                        payload,
                        since,
                        &mut summary,
                    )
                    .await;
                }
            }
            Err(e) => {
                tracing::error!(
                    listing_id = listing.id,
                    error = %e,
                    "Failed to compute the interested audience"
                );
                summary.failed += 1;
            }
        }

        summary
    }

    /// Fan out for a settlement with no winner: the seller hears "no
    /// winner", viewers hear "expired without a winner".
    pub async fn expired_no_winner(&self, listing: &Listing, now: Timestamp) -> FanoutSummary {
        let mut summary = FanoutSummary::default();

        let (title, body) = events::no_winner_message(&listing.title);
        let payload = json!({
            "type": events::EVENT_NO_WINNER,
            "listingId": listing.id,
        });
        self.emit(
            listing.seller_id,
            events::EVENT_NO_WINNER,
            listing.id,
            title,
            body,
            payload,
            now - self.config.dedup_window,
            &mut summary,
        )
        .await;

        // Viewers use the wider window: a no-winner listing can be swept
        // again much later by the catch-up pass.
        let viewer_since = now - self.config.viewer_dedup_window;
        match self.stores.views.distinct_viewers(listing.id).await {
            Ok(viewers) => {
                for viewer in viewers {
                    if viewer == listing.seller_id {
                        continue;
                    }
                    let (title, body) = events::expired_no_winner_message(&listing.title);
                    let payload = json!({
                        "type": events::EVENT_LISTING_EXPIRED_NO_WINNER,
                        "listingId": listing.id,
                    });
                    self.emit(
                        viewer,
                        events::EVENT_LISTING_EXPIRED_NO_WINNER,
                        listing.id,
                        title,
                        body,
                        payload,
                        viewer_since,
                        &mut summary,
                    )
                    .await;
                }
            }
            Err(e) => {
                tracing::error!(
                    listing_id = listing.id,
                    error = %e,
                    "Failed to list viewers for no-winner fan-out"
                );
                summary.failed += 1;
            }
        }

        summary
    }

    /// Union of actors and viewers, minus the winner and the seller.
    ///
    /// `BTreeSet` keeps the emission order deterministic.
    async fn other_interested(
        &self,
        listing: &Listing,
        winner_id: DbId,
    ) -> Result<Vec<DbId>, StoreError> {
        let mut audience: BTreeSet<DbId> = self
            .stores
            .actions
            .distinct_actors(listing.id)
            .await?
            .into_iter()
            .collect();
        audience.extend(self.stores.views.distinct_viewers(listing.id).await?);
        audience.remove(&winner_id);
        audience.remove(&listing.seller_id);
        Ok(audience.into_iter().collect())
    }

    /// Emit one notification unless an equivalent one exists in the window.
    #[allow(clippy::too_many_arguments)]
    async fn emit(
        &self,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        title: &str,
        body: String,
        payload: serde_json::Value,
        since: Timestamp,
        summary: &mut FanoutSummary,
    ) {
        match self
            .try_emit(recipient_id, event_type, listing_id, title, body, payload, since)
            .await
        {
            Ok(Emitted::Created(_)) => summary.created += 1,
            Ok(Emitted::Existing(_)) => summary.deduplicated += 1,
            Err(e) => {
                tracing::error!(
                    recipient_id,
                    event_type,
                    listing_id,
                    error = %e,
                    "Failed to emit notification"
                );
                summary.failed += 1;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn try_emit(
        &self,
        recipient_id: DbId,
        event_type: &str,
        listing_id: DbId,
        title: &str,
        body: String,
        payload: serde_json::Value,
        since: Timestamp,
    ) -> Result<Emitted, StoreError> {
        if let Some(existing) = self
            .stores
            .notifications
            .find_recent(recipient_id, event_type, listing_id, since)
            .await?
        {
            return Ok(Emitted::Existing(existing));
        }

        let id = self
            .stores
            .notifications
            .create(&NewNotification {
                recipient_id,
                title: title.to_string(),
                body,
                event_type: event_type.to_string(),
                listing_id: Some(listing_id),
                payload,
            })
            .await?;
        Ok(Emitted::Created(id))
    }
}
