//! Listing status state machine.
//!
//! A listing is created `active` and makes exactly one terminal transition:
//! to `expired` via the reconciliation engine, or to `locked`/`sold` via a
//! user action. Invalid transitions (e.g. `expired -> expired`) are rejected
//! here, at the type level, rather than by ad-hoc string checks.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Listing accepting actions, countdown running.
pub const STATUS_ACTIVE: &str = "active";
/// Countdown elapsed, settled by the reconciliation engine.
pub const STATUS_EXPIRED: &str = "expired";
/// Bought out at the lock price by a user.
pub const STATUS_LOCKED: &str = "locked";
/// Sold and handed over.
pub const STATUS_SOLD: &str = "sold";

/// All valid listing statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_EXPIRED, STATUS_LOCKED, STATUS_SOLD];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Listing status enum with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Expired,
    Locked,
    Sold,
}

impl ListingStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Expired => STATUS_EXPIRED,
            Self::Locked => STATUS_LOCKED,
            Self::Sold => STATUS_SOLD,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_EXPIRED => Ok(Self::Expired),
            STATUS_LOCKED => Ok(Self::Locked),
            STATUS_SOLD => Ok(Self::Sold),
            other => Err(CoreError::Parse(format!(
                "Unknown listing status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether the status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod transitions {
    use super::ListingStatus;

    /// Returns the set of valid target statuses reachable from `from`.
    ///
    /// Terminal states (Expired, Locked, Sold) return an empty slice because
    /// no further transitions are allowed.
    pub fn valid_transitions(from: ListingStatus) -> &'static [ListingStatus] {
        match from {
            ListingStatus::Active => &[
                ListingStatus::Expired,
                ListingStatus::Locked,
                ListingStatus::Sold,
            ],
            ListingStatus::Expired | ListingStatus::Locked | ListingStatus::Sold => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: ListingStatus, to: ListingStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: ListingStatus, to: ListingStatus) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid transition: {} -> {}",
                from.as_str(),
                to.as_str()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::transitions::*;
    use super::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn active_to_expired() {
        assert!(can_transition(ListingStatus::Active, ListingStatus::Expired));
    }

    #[test]
    fn active_to_locked() {
        assert!(can_transition(ListingStatus::Active, ListingStatus::Locked));
    }

    #[test]
    fn active_to_sold() {
        assert!(can_transition(ListingStatus::Active, ListingStatus::Sold));
    }

    // -----------------------------------------------------------------------
    // Terminal states have no outgoing transitions
    // -----------------------------------------------------------------------

    #[test]
    fn expired_has_no_transitions() {
        assert!(valid_transitions(ListingStatus::Expired).is_empty());
    }

    #[test]
    fn locked_has_no_transitions() {
        assert!(valid_transitions(ListingStatus::Locked).is_empty());
    }

    #[test]
    fn sold_has_no_transitions() {
        assert!(valid_transitions(ListingStatus::Sold).is_empty());
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn expired_to_expired_invalid() {
        assert!(!can_transition(ListingStatus::Expired, ListingStatus::Expired));
    }

    #[test]
    fn expired_to_active_invalid() {
        assert!(!can_transition(ListingStatus::Expired, ListingStatus::Active));
    }

    #[test]
    fn locked_to_expired_invalid() {
        assert!(!can_transition(ListingStatus::Locked, ListingStatus::Expired));
    }

    #[test]
    fn sold_to_active_invalid() {
        assert!(!can_transition(ListingStatus::Sold, ListingStatus::Active));
    }

    // -----------------------------------------------------------------------
    // validate_transition returns descriptive error
    // -----------------------------------------------------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(ListingStatus::Active, ListingStatus::Expired).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err =
            validate_transition(ListingStatus::Expired, ListingStatus::Expired).unwrap_err();
        assert!(err.contains("expired"));
    }

    // -----------------------------------------------------------------------
    // String conversion
    // -----------------------------------------------------------------------

    #[test]
    fn round_trips_all_statuses() {
        for s in VALID_STATUSES {
            assert_eq!(ListingStatus::from_str(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn unknown_status_is_an_error() {
        assert!(ListingStatus::from_str("archived").is_err());
    }

    #[test]
    fn active_is_not_terminal() {
        assert!(!ListingStatus::Active.is_terminal());
        assert!(ListingStatus::Expired.is_terminal());
        assert!(ListingStatus::Locked.is_terminal());
        assert!(ListingStatus::Sold.is_terminal());
    }
}
