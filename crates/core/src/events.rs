//! Notification event types, activity labels, and message builders.
//!
//! Event types travel in the notification data payload's `type` field and
//! drive client-side routing; activity labels are the durable audit strings
//! written to the activity log. The settlement labels double as the
//! engine's idempotency fence, so their exact spelling matters.

// ---------------------------------------------------------------------------
// Notification event types
// ---------------------------------------------------------------------------

/// Sent to the winner: settlement succeeded, payment countdown started.
pub const EVENT_PAYMENT_REQUIRED: &str = "payment_required";
/// Sent to the seller when a winner was determined.
pub const EVENT_WINNER_DETERMINED: &str = "winner_determined";
/// Sent to non-winning participants and viewers.
pub const EVENT_LISTING_EXPIRED_LOST: &str = "listing_expired_lost";
/// Sent to the seller when the listing expired without qualifying actions.
pub const EVENT_NO_WINNER: &str = "no_winner";
/// Sent to viewers when the listing expired without qualifying actions.
pub const EVENT_LISTING_EXPIRED_NO_WINNER: &str = "listing_expired_no_winner";

// ---------------------------------------------------------------------------
// Activity labels
// ---------------------------------------------------------------------------

/// Settlement entry: listing expired and a winner was recorded.
pub const ACTIVITY_EXPIRED_WINNER: &str = "Listing Expired - Winner";
/// Settlement entry: listing expired with no winner.
pub const ACTIVITY_EXPIRED_NO_WINNER: &str = "Listing Expired - No Winner";
/// The payment countdown for a settled winner was started.
pub const ACTIVITY_PAYMENT_WINDOW_STARTED: &str = "Payment Window Started";

/// Activity labels that mark a listing as settled.
pub const SETTLEMENT_LABELS: &[&str] = &[ACTIVITY_EXPIRED_WINNER, ACTIVITY_EXPIRED_NO_WINNER];

// ---------------------------------------------------------------------------
// Message builders
// ---------------------------------------------------------------------------

/// Winner's "payment required" message.
pub fn payment_required_message(listing_title: &str, amount: f64) -> (&'static str, String) {
    (
        "You won the auction!",
        format!(
            "You won \"{listing_title}\" for ₱{amount:.2}. Complete your payment to claim it."
        ),
    )
}

/// Seller's "winner determined" message.
pub fn winner_determined_message(
    listing_title: &str,
    winner_name: &str,
    amount: f64,
) -> (&'static str, String) {
    (
        "Your listing has a winner",
        format!("\"{listing_title}\" went to {winner_name} for ₱{amount:.2}."),
    )
}

/// "You lost" message for other participants and viewers.
pub fn listing_lost_message(listing_title: &str) -> (&'static str, String) {
    (
        "Auction ended",
        format!("\"{listing_title}\" has expired and went to another buyer."),
    )
}

/// Seller's "no winner" message.
pub fn no_winner_message(listing_title: &str) -> (&'static str, String) {
    (
        "Your listing expired",
        format!("\"{listing_title}\" expired without a qualifying claim or bid."),
    )
}

/// Viewer's "expired, no winner" message.
pub fn expired_no_winner_message(listing_title: &str) -> (&'static str, String) {
    (
        "Auction ended",
        format!("\"{listing_title}\" has expired without a winner."),
    )
}
