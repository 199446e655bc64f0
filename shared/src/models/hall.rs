//! Hall Model

use super::booking::TimeSlot;
use super::present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bookable hall (soft-deleted)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Hall {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub location: Option<String>,
    /// Informational list price; booking totals come from items only
    pub base_price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create hall payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallCreate {
    pub name: String,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub base_price: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Update hall payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HallUpdate {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    pub base_price: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HallListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub active_only: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

/// Slot occupancy for one hall on one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HallAvailability {
    pub hall_id: i64,
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub time_slot: TimeSlot,
    pub available: bool,
    /// Booking that blocks the slot, if any
    pub booking_code: Option<String>,
}
