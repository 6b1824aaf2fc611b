//! Winner determination for an expired listing.
//!
//! A pure reduction from a listing's recorded actions to the single winning
//! action, or none. The ordering is total — action-kind priority, then
//! amount descending, then earliest timestamp — and there is no hidden
//! state, so resolving the same input twice always yields the same winner.

use std::cmp::Ordering;

use crate::action::{ActionKind, ActionRecord};
use crate::money;
use crate::types::{DbId, Timestamp};

/// The action judged highest-priority at expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub actor_id: DbId,
    pub actor_name: String,
    pub kind: ActionKind,
    pub amount: f64,
}

/// Resolve the winning action from a listing's action set.
///
/// Returns `None` for an empty action set. A winning action with a missing
/// actor id or a blank actor name also resolves to `None`: corrupt upstream
/// data is treated as "no winner" rather than an error.
pub fn resolve(actions: &[ActionRecord]) -> Option<Winner> {
    let mut ranked: Vec<(u8, f64, Timestamp, &ActionRecord)> = actions
        .iter()
        .map(|a| {
            (
                a.kind.priority(),
                money::parse_amount(&a.details),
                a.created_at,
                a,
            )
        })
        .collect();

    ranked.sort_by(|x, y| {
        x.0.cmp(&y.0)
            .then(y.1.partial_cmp(&x.1).unwrap_or(Ordering::Equal))
            .then(x.2.cmp(&y.2))
    });

    let (_, amount, _, top) = ranked.first()?;

    let actor_id = top.actor_id?;
    if top.actor_name.trim().is_empty() {
        return None;
    }

    Some(Winner {
        actor_id,
        actor_name: top.actor_name.clone(),
        kind: top.kind,
        amount: *amount,
    })
}
