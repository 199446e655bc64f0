//! Aggregates for the dashboard

use sqlx::SqlitePool;

use crate::services::pricing;

/// Sum of balances over live pending and confirmed bookings
pub async fn outstanding_balance(pool: &SqlitePool) -> Result<f64, sqlx::Error> {
    let balances: Vec<f64> = sqlx::query_scalar(
        "SELECT balance FROM bookings \
         WHERE deleted_at IS NULL AND status IN ('pending', 'confirmed') AND balance > 0",
    )
    .fetch_all(pool)
    .await?;
    Ok(pricing::sum_money(balances))
}
