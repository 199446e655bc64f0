//! Booking Model

use super::payment::{Payment, PaymentSummary};
use super::present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Part of the day a hall is reserved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    FullDay,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::FullDay,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::FullDay => "full_day",
        }
    }

    /// Whether two reservations of the same hall on the same date collide.
    /// A full-day reservation collides with every slot.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self == other || *self == TimeSlot::FullDay || *other == TimeSlot::FullDay
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled bookings no longer change
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (a, b) if *a == b => !a.is_terminal(),
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, Completed) | (Confirmed, Cancelled) | (Confirmed, Pending) => true,
            _ => false,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking row with joined customer and hall names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    /// `BK20250001`
    pub booking_code: String,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub hall_id: i64,
    pub hall_name: Option<String>,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub event_type: Option<String>,
    pub guest_count: Option<i32>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    /// Sum of item subtotals
    pub subtotal: f64,
    pub dinner_total: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub balance: f64,
    pub quotation_id: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingItem {
    pub id: i64,
    pub booking_id: i64,
    pub billing_item_id: Option<i64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Dinner package attached to a booking (price captured at booking time)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingDinnerPackage {
    pub id: i64,
    pub booking_id: i64,
    pub dinner_package_id: i64,
    pub package_name: String,
    pub table_count: i32,
    pub price_per_table: f64,
    pub total: f64,
}

/// Line item input for bookings and quotations.
///
/// `unit_price` and `description` default to the billing item's price and name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
    pub billing_item_id: Option<i64>,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DinnerPackageSelection {
    pub dinner_package_id: i64,
    pub table_count: i32,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub customer_id: i64,
    pub hall_id: i64,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub event_type: Option<String>,
    pub guest_count: Option<i32>,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    pub dinner_package: Option<DinnerPackageSelection>,
}

/// Update booking payload.
///
/// `items` replaces all line items when present. `dinner_package` replaces the
/// package when set to an object and removes it when set to `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub customer_id: Option<i64>,
    pub hall_id: Option<i64>,
    pub event_date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    #[serde(default, deserialize_with = "present")]
    pub event_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub guest_count: Option<Option<i32>>,
    pub status: Option<BookingStatus>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub items: Option<Vec<LineItemInput>>,
    #[serde(default, deserialize_with = "present")]
    pub dinner_package: Option<Option<DinnerPackageSelection>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<BookingStatus>,
    pub hall_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Matches booking code or customer name
    pub search: Option<String>,
}

/// Booking with items, dinner package, payments and payment summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub items: Vec<BookingItem>,
    pub dinner_package: Option<BookingDinnerPackage>,
    pub payments: Vec<Payment>,
    pub payment_summary: PaymentSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_day_overlaps_everything() {
        for slot in TimeSlot::ALL {
            assert!(TimeSlot::FullDay.overlaps(&slot));
            assert!(slot.overlaps(&TimeSlot::FullDay));
        }
        assert!(TimeSlot::Morning.overlaps(&TimeSlot::Morning));
        assert!(!TimeSlot::Morning.overlaps(&TimeSlot::Evening));
        assert!(!TimeSlot::Afternoon.overlaps(&TimeSlot::Evening));
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_update_dinner_package_null_vs_absent() {
        let update: BookingUpdate = serde_json::from_str(r#"{"notes":"x"}"#).unwrap();
        assert!(update.dinner_package.is_none());

        let update: BookingUpdate = serde_json::from_str(r#"{"dinner_package":null}"#).unwrap();
        assert!(matches!(update.dinner_package, Some(None)));

        let update: BookingUpdate = serde_json::from_str(
            r#"{"dinner_package":{"dinner_package_id":2,"table_count":10}}"#,
        )
        .unwrap();
        let selection = update.dinner_package.flatten().unwrap();
        assert_eq!(selection.dinner_package_id, 2);
        assert_eq!(selection.table_count, 10);
    }

    #[test]
    fn test_update_text_null_vs_absent() {
        let update: BookingUpdate = serde_json::from_str(r#"{"guest_count":80}"#).unwrap();
        assert!(update.notes.is_none());
        assert_eq!(update.guest_count, Some(Some(80)));

        let update: BookingUpdate =
            serde_json::from_str(r#"{"notes":null,"guest_count":null}"#).unwrap();
        assert_eq!(update.notes, Some(None));
        assert_eq!(update.guest_count, Some(None));
    }

    #[test]
    fn test_time_slot_serde() {
        assert_eq!(
            serde_json::to_string(&TimeSlot::FullDay).unwrap(),
            "\"full_day\""
        );
        let slot: TimeSlot = serde_json::from_str("\"evening\"").unwrap();
        assert_eq!(slot, TimeSlot::Evening);
    }
}
