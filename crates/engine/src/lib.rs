//! Listing-expiration reconciliation engine.
//!
//! This crate provides the background machinery that settles expired
//! marketplace listings:
//!
//! - [`EngineConfig`] — tuning knobs loaded from environment variables.
//! - [`store`] — capability traits for the externally-owned stores.
//! - [`pg`] — PostgreSQL implementations of those capabilities.
//! - [`HandledCache`] — bounded process-local idempotency cache.
//! - [`LifecycleSignal`] — app foreground/background broadcast hub.
//! - [`Reconciler`] — one sweep: find expired candidates, re-validate
//!   against the store fences, resolve the winner, transition state
//!   exactly once.
//! - [`NotificationFanout`] — audience computation and idempotent
//!   notification emission.
//! - [`ExpirationScheduler`] — periodic and foreground-triggered driver.

pub mod cache;
pub mod config;
pub mod fanout;
pub mod lifecycle;
pub mod pg;
pub mod reconciler;
pub mod scheduler;
pub mod store;

pub use cache::HandledCache;
pub use config::EngineConfig;
pub use fanout::{FanoutSummary, NotificationFanout};
pub use lifecycle::{LifecycleEvent, LifecycleSignal};
pub use reconciler::{Reconciler, SweepOutcome, SweepReport};
pub use scheduler::{ExpirationScheduler, SchedulerStatus};
pub use store::{StoreError, Stores};
