//! Action kinds a user may perform against a listing.
//!
//! Actions are append-only: once recorded in the action log they are never
//! mutated or deleted. Each kind carries a settlement priority used by the
//! winner resolver.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Kind constants
// ---------------------------------------------------------------------------

/// Claim at the base price.
pub const KIND_MINE: &str = "mine";
/// Claim over an existing claim at the steal price.
pub const KIND_STEAL: &str = "steal";
/// Buy out at the lock price, ending the auction.
pub const KIND_LOCK: &str = "lock";
/// Free-form price offer.
pub const KIND_BID: &str = "bid";

/// All valid action kinds.
pub const VALID_KINDS: &[&str] = &[KIND_MINE, KIND_STEAL, KIND_LOCK, KIND_BID];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Action kind enum with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Mine,
    Steal,
    Lock,
    Bid,
}

impl ActionKind {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mine => KIND_MINE,
            Self::Steal => KIND_STEAL,
            Self::Lock => KIND_LOCK,
            Self::Bid => KIND_BID,
        }
    }

    /// Parse from a string, returning an error for unknown kinds.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_MINE => Ok(Self::Mine),
            KIND_STEAL => Ok(Self::Steal),
            KIND_LOCK => Ok(Self::Lock),
            KIND_BID => Ok(Self::Bid),
            other => Err(CoreError::Parse(format!(
                "Unknown action kind: '{other}'. Valid kinds: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }

    /// Settlement priority. Lower wins: Lock beats Steal beats Mine beats Bid.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Lock => 1,
            Self::Steal => 2,
            Self::Mine => 3,
            Self::Bid => 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver input
// ---------------------------------------------------------------------------

/// A single recorded action, as fed to the winner resolver.
///
/// Decoupled from the database row type so the resolver stays pure.
#[derive(Debug, Clone)]
pub struct ActionRecord {
    /// Acting user, if the record carries one. Corrupt upstream data may not.
    pub actor_id: Option<DbId>,
    pub actor_name: String,
    pub kind: ActionKind,
    /// Currency-prefixed amount string, e.g. `"₱1,500.00"`.
    pub details: String,
    pub created_at: Timestamp,
}
