//! Revoked token IDs (logout)

use sqlx::SqlitePool;

/// Revoke a token until its natural expiry (`expires_at` in unix seconds)
pub async fn revoke(pool: &SqlitePool, jti: &str, expires_at: i64) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?, ?)")
        .bind(jti)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_revoked(pool: &SqlitePool, jti: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM revoked_tokens WHERE jti = ?")
        .bind(jti)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Drop entries whose tokens have expired anyway
pub async fn purge_expired(pool: &SqlitePool, now_secs: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
        .bind(now_secs)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
