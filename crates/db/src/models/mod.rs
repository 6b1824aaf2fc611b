//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod activity;
pub mod listing;
pub mod listing_action;
pub mod listing_view;
pub mod notification;
