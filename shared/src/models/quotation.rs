//! Quotation Model

use super::booking::{DinnerPackageSelection, LineItemInput, TimeSlot};
use super::present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
    Converted,
}

impl QuotationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Accepted => "accepted",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
            QuotationStatus::Converted => "converted",
        }
    }

    /// Status as reported to clients: an open quotation past `valid_until` is expired.
    pub fn effective(self, valid_until: NaiveDate, today: NaiveDate) -> Self {
        match self {
            QuotationStatus::Draft | QuotationStatus::Sent if valid_until < today => {
                QuotationStatus::Expired
            }
            other => other,
        }
    }

    /// Draft and sent quotations can still be edited or answered
    pub const fn is_open(&self) -> bool {
        matches!(self, QuotationStatus::Draft | QuotationStatus::Sent)
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quotation row with joined customer and hall names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Quotation {
    pub id: i64,
    /// `QT20250001`
    pub quotation_code: String,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub hall_id: i64,
    pub hall_name: Option<String>,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub valid_until: NaiveDate,
    pub status: QuotationStatus,
    pub notes: Option<String>,
    pub subtotal: f64,
    pub dinner_package_id: Option<i64>,
    pub table_count: Option<i32>,
    pub dinner_price_per_table: Option<f64>,
    pub dinner_total: f64,
    pub total_amount: f64,
    /// Set once converted
    pub booking_id: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Quotation {
    /// Replace the stored status with the one clients should see
    pub fn with_effective_status(mut self, today: NaiveDate) -> Self {
        self.status = self.status.effective(self.valid_until, today);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QuotationItem {
    pub id: i64,
    pub quotation_id: i64,
    pub billing_item_id: Option<i64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<QuotationItem>,
}

/// Create quotation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationCreate {
    pub customer_id: i64,
    pub hall_id: i64,
    pub event_date: NaiveDate,
    pub time_slot: TimeSlot,
    /// Defaults to today plus the `quotation_validity_days` setting
    pub valid_until: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItemInput>,
    pub dinner_package: Option<DinnerPackageSelection>,
}

/// Update quotation payload (open quotations only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotationUpdate {
    pub customer_id: Option<i64>,
    pub hall_id: Option<i64>,
    pub event_date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub valid_until: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub items: Option<Vec<LineItemInput>>,
    #[serde(default, deserialize_with = "present")]
    pub dinner_package: Option<Option<DinnerPackageSelection>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filters on the effective status
    pub status: Option<QuotationStatus>,
    pub customer_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_open_quotation_expires_after_valid_until() {
        let today = d(2025, 6, 10);
        assert_eq!(
            QuotationStatus::Sent.effective(d(2025, 6, 9), today),
            QuotationStatus::Expired
        );
        assert_eq!(
            QuotationStatus::Draft.effective(d(2025, 6, 9), today),
            QuotationStatus::Expired
        );
        // valid through the last day
        assert_eq!(
            QuotationStatus::Sent.effective(d(2025, 6, 10), today),
            QuotationStatus::Sent
        );
    }

    #[test]
    fn test_closed_quotation_never_expires() {
        let today = d(2025, 6, 10);
        let past = d(2025, 1, 1);
        assert_eq!(
            QuotationStatus::Accepted.effective(past, today),
            QuotationStatus::Accepted
        );
        assert_eq!(
            QuotationStatus::Rejected.effective(past, today),
            QuotationStatus::Rejected
        );
        assert_eq!(
            QuotationStatus::Converted.effective(past, today),
            QuotationStatus::Converted
        );
    }
}
