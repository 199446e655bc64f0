//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

use serde::{Deserialize, Deserializer};

pub mod billing_item;
pub mod booking;
pub mod catering_vendor;
pub mod customer;
pub mod dashboard;
pub mod devotee;
pub mod dinner_package;
pub mod hall;
pub mod payment;
pub mod quotation;
pub mod system_setting;
pub mod user;

// Re-exports
pub use billing_item::*;
pub use booking::*;
pub use catering_vendor::*;
pub use customer::*;
pub use dashboard::*;
pub use devotee::*;
pub use dinner_package::*;
pub use hall::*;
pub use payment::*;
pub use quotation::*;
pub use system_setting::*;
pub use user::*;

/// Distinguishes an explicit `null` from an absent field
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
