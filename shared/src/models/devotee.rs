//! Devotee Model

use super::present;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Temple devotee record (soft-deleted), separate from booking customers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Devotee {
    pub id: i64,
    /// `DEV00001`
    pub devotee_code: String,
    pub name: String,
    pub chinese_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create devotee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevoteeCreate {
    pub name: String,
    pub chinese_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Update devotee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevoteeUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub chinese_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevoteeListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Matches code, name, chinese name or phone
    pub search: Option<String>,
    pub active_only: Option<bool>,
}
