//! Catering Vendor Model

use super::dinner_package::DinnerPackage;
use super::present;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CateringVendor {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Vendor with its dinner packages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringVendorDetail {
    #[serde(flatten)]
    pub vendor: CateringVendor,
    pub packages: Vec<DinnerPackage>,
}

/// Create vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringVendorCreate {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

/// Update vendor payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CateringVendorUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub contact_person: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CateringVendorListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub active_only: Option<bool>,
}
