use chrono::{Datelike, NaiveDate};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's calendar date (UTC)
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Current calendar year (UTC), used by yearly business codes
pub fn current_year() -> i32 {
    today().year()
}
