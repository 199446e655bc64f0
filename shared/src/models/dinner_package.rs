//! Dinner Package Model

use super::present;
use serde::{Deserialize, Serialize};

/// Fixed-price catering bundle sold per table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DinnerPackage {
    pub id: i64,
    pub catering_vendor_id: i64,
    /// Joined from catering_vendors
    pub vendor_name: Option<String>,
    pub name: String,
    pub price_per_table: f64,
    pub min_tables: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dinner package payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinnerPackageCreate {
    pub catering_vendor_id: i64,
    pub name: String,
    pub price_per_table: f64,
    pub min_tables: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Update dinner package payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DinnerPackageUpdate {
    pub catering_vendor_id: Option<i64>,
    pub name: Option<String>,
    pub price_per_table: Option<f64>,
    pub min_tables: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DinnerPackageListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub catering_vendor_id: Option<i64>,
    pub active_only: Option<bool>,
}
