//! Business rules shared by several handlers

pub mod bookings;
pub mod codes;
pub mod payment_due;
pub mod pricing;
