//! Dashboard Model

use super::booking::Booking;
use super::payment::PaymentDueEntry;
use serde::{Deserialize, Serialize};

/// Front-page figures for the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub customer_count: i64,
    pub devotee_count: i64,
    pub active_hall_count: i64,
    /// Pending and confirmed bookings in the next 30 days
    pub upcoming_bookings: Vec<Booking>,
    /// Draft or sent quotations that have not expired
    pub open_quotations: i64,
    /// Sum of balances over pending and confirmed bookings
    pub outstanding_balance: f64,
    pub collected_this_month: f64,
    pub payments_due: Vec<PaymentDueEntry>,
}
