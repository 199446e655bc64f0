//! Billing Item Model

use super::present;
use serde::{Deserialize, Serialize};

/// Chargeable line item template (hall rental, decoration, sound system...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BillingItem {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create billing item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingItemCreate {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub unit_price: f64,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Update billing item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingItemUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub unit: Option<Option<String>>,
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingItemListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub active_only: Option<bool>,
}
