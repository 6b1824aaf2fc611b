//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod listing_action_repo;
pub mod listing_repo;
pub mod listing_view_repo;
pub mod notification_repo;

pub use activity_repo::ActivityRepo;
pub use listing_action_repo::ListingActionRepo;
pub use listing_repo::ListingRepo;
pub use listing_view_repo::ListingViewRepo;
pub use notification_repo::NotificationRepo;
