//! Core domain logic for the bentahan marketplace backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the reconciliation engine, and any future CLI tooling.
//! It provides:
//!
//! - Shared type aliases ([`types`])
//! - Domain error types ([`error`])
//! - The listing status state machine ([`listing`])
//! - Action kinds and their settlement priorities ([`action`])
//! - Currency-amount and expiry-representation parsing ([`money`], [`expiry`])
//! - The pure winner resolver ([`winner`])
//! - Notification event types and activity labels ([`events`])

pub mod action;
pub mod error;
pub mod events;
pub mod expiry;
pub mod listing;
pub mod money;
pub mod types;
pub mod winner;

pub use action::{ActionKind, ActionRecord};
pub use error::CoreError;
pub use listing::ListingStatus;
pub use winner::Winner;
