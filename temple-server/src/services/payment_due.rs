//! Payment status and due-date heuristics
//!
//! The full balance falls due `payment_due_days` before the event date.
//! A due date at most [`DUE_SOON_WINDOW_DAYS`] away counts as due soon.

use chrono::{Duration, NaiveDate};
use shared::models::{DueStatus, PaymentStatus, PaymentSummary};

/// Days before the due date during which a booking is reported as due soon
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// A balance at or below one cent counts as settled
pub const SETTLED_EPSILON: f64 = 0.01;

pub fn payment_status(total: f64, paid: f64) -> PaymentStatus {
    if super::pricing::balance(total, paid) <= SETTLED_EPSILON {
        PaymentStatus::Paid
    } else if paid <= 0.0 {
        PaymentStatus::Unpaid
    } else {
        PaymentStatus::Partial
    }
}

pub fn due_date(event_date: NaiveDate, due_days: i64) -> NaiveDate {
    event_date - Duration::days(due_days.max(0))
}

pub fn due_status(balance: f64, due_date: NaiveDate, today: NaiveDate) -> DueStatus {
    if balance <= SETTLED_EPSILON {
        DueStatus::Settled
    } else if today > due_date {
        DueStatus::Overdue
    } else if (due_date - today).num_days() <= DUE_SOON_WINDOW_DAYS {
        DueStatus::DueSoon
    } else {
        DueStatus::NotDue
    }
}

/// Full payment picture for one booking as of `today`
pub fn summarize(
    total: f64,
    paid: f64,
    event_date: NaiveDate,
    due_days: i64,
    today: NaiveDate,
) -> PaymentSummary {
    let balance = super::pricing::balance(total, paid);
    let due_date = due_date(event_date, due_days);
    PaymentSummary {
        total_amount: total,
        paid_amount: paid,
        balance,
        payment_status: payment_status(total, paid),
        due_status: due_status(balance, due_date, today),
        due_date,
        days_until_event: (event_date - today).num_days(),
    }
}

/// Whether the summary belongs in the payments-due report
pub fn needs_attention(summary: &PaymentSummary) -> bool {
    matches!(summary.due_status, DueStatus::Overdue | DueStatus::DueSoon)
}
