//! Dashboard API Handler

use axum::{Json, extract::State};
use chrono::{Datelike, Duration};
use shared::models::DashboardSummary;

use crate::api::ApiResult;
use crate::db;
use crate::services::bookings::payments_due;
use crate::state::AppState;

/// Days ahead covered by the upcoming bookings list
const UPCOMING_DAYS: i64 = 30;
const UPCOMING_LIMIT: i64 = 10;

/// GET /api/dashboard
pub async fn summary(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let pool = &state.pool;
    let today = shared::util::today();
    let month_start = today.with_day(1).unwrap_or(today);

    Ok(Json(DashboardSummary {
        customer_count: db::customers::count(pool).await?,
        devotee_count: db::devotees::count(pool).await?,
        active_hall_count: db::halls::count_active(pool).await?,
        upcoming_bookings: db::bookings::upcoming(
            pool,
            today,
            today + Duration::days(UPCOMING_DAYS),
            UPCOMING_LIMIT,
        )
        .await?,
        open_quotations: db::quotations::count_open(pool, today).await?,
        outstanding_balance: db::dashboard::outstanding_balance(pool).await?,
        collected_this_month: db::payments::total_between(pool, month_start, today).await?,
        payments_due: payments_due(pool, None, today).await?,
    }))
}
