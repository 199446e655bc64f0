//! System Setting Model

use serde::{Deserialize, Serialize};

/// Days before the event by which the full balance is due
pub const SETTING_PAYMENT_DUE_DAYS: &str = "payment_due_days";
/// Default quotation validity in days
pub const SETTING_QUOTATION_VALIDITY_DAYS: &str = "quotation_validity_days";

pub const DEFAULT_PAYMENT_DUE_DAYS: i64 = 14;
pub const DEFAULT_QUOTATION_VALIDITY_DAYS: i64 = 30;

/// Key/value setting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub group: String,
    pub description: Option<String>,
    pub updated_at: i64,
}

/// `PUT /api/settings/{key}` payload (upsert)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettingUpsert {
    pub value: String,
    pub group: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemSettingQuery {
    pub group: Option<String>,
}
