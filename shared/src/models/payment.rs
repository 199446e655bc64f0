//! Payment Model

use super::present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Cheque,
    Online,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment row with the joined booking code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    /// `PAY20250001`
    pub payment_code: String,
    pub booking_id: i64,
    pub booking_code: Option<String>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub paid_at: NaiveDate,
    pub notes: Option<String>,
    pub received_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub booking_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    /// Defaults to today
    pub paid_at: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Update payment payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub amount: Option<f64>,
    pub method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "present")]
    pub reference: Option<Option<String>>,
    pub paid_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub booking_id: Option<i64>,
    pub method: Option<PaymentMethod>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Nothing outstanding
    Settled,
    Overdue,
    DueSoon,
    NotDue,
}

/// Derived payment position of a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_amount: f64,
    pub paid_amount: f64,
    pub balance: f64,
    pub payment_status: PaymentStatus,
    pub due_status: DueStatus,
    /// Date by which the full balance is due
    pub due_date: NaiveDate,
    /// Negative once the event has passed
    pub days_until_event: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDueQuery {
    /// Only bookings whose due date falls within this many days (overdue ones always included)
    pub within_days: Option<i64>,
}

/// Booking with an outstanding balance that is due soon or overdue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDueEntry {
    pub booking_id: i64,
    pub booking_code: String,
    pub customer_name: Option<String>,
    pub hall_name: Option<String>,
    pub event_date: NaiveDate,
    pub summary: PaymentSummary,
}
