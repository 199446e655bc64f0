//! Key/value settings grouped for the admin UI

use shared::models::{SystemSetting, SystemSettingUpsert};
use sqlx::SqlitePool;

const COLUMNS: &str = "key, value, setting_group AS \"group\", description, updated_at";

pub async fn list(pool: &SqlitePool, group: Option<&str>) -> Result<Vec<SystemSetting>, sqlx::Error> {
    match group.filter(|g| !g.is_empty()) {
        Some(group) => {
            sqlx::query_as::<_, SystemSetting>(&format!(
                "SELECT {COLUMNS} FROM system_settings WHERE setting_group = ? ORDER BY key"
            ))
            .bind(group)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, SystemSetting>(&format!(
                "SELECT {COLUMNS} FROM system_settings ORDER BY setting_group, key"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<SystemSetting>, sqlx::Error> {
    sqlx::query_as::<_, SystemSetting>(&format!(
        "SELECT {COLUMNS} FROM system_settings WHERE key = ?"
    ))
    .bind(key)
    .fetch_optional(pool)
    .await
}

/// Integer setting, falling back to `default` when missing or unparsable
pub async fn get_i64(pool: &SqlitePool, key: &str, default: i64) -> Result<i64, sqlx::Error> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM system_settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default))
}

/// Insert or replace. A missing group or description keeps the stored one.
pub async fn upsert(
    pool: &SqlitePool,
    key: &str,
    data: &SystemSettingUpsert,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO system_settings (key, value, setting_group, description, updated_at) \
         VALUES (?1, ?2, COALESCE(?3, 'general'), ?4, ?5) \
         ON CONFLICT (key) DO UPDATE SET \
            value = excluded.value, \
            setting_group = COALESCE(?3, system_settings.setting_group), \
            description = COALESCE(?4, system_settings.description), \
            updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(&data.value)
    .bind(&data.group)
    .bind(&data.description)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM system_settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
