//! Payment API Handlers
//!
//! Each write recomputes the booking's paid amount and balance from the
//! payments table inside the same transaction.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Booking, BookingStatus, Payment, PaymentCreate, PaymentDueEntry, PaymentDueQuery,
    PaymentListQuery, PaymentUpdate,
};
use shared::response::{PageRequest, PaginatedResponse};
use sqlx::SqliteConnection;

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::db::payments::PaymentRow;
use crate::error::ServiceResult;
use crate::services::bookings::payments_due;
use crate::state::AppState;
use crate::validation::{
    MAX_AMOUNT, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, nullable_value, patched_text,
    validate_optional_text,
};

/// Rounding slack when comparing an amount against a balance
const AMOUNT_TOLERANCE: f64 = 0.005;

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::PaymentNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<Payment> {
    Ok(db::payments::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount <= 0.0 || amount > MAX_AMOUNT {
        return Err(AppError::new(ErrorCode::PaymentInvalidAmount).with_detail("amount", amount));
    }
    Ok(())
}

fn validate_fields(reference: &Option<String>, notes: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(reference, "reference", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// Load the booking a payment applies to; cancelled bookings take no money
async fn payable_booking(conn: &mut SqliteConnection, booking_id: i64) -> ServiceResult<Booking> {
    let booking = db::bookings::find_by_id(&mut *conn, booking_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::BookingNotFound).with_detail("booking_id", booking_id)
        })?;
    if booking.status == BookingStatus::Cancelled {
        return Err(AppError::new(ErrorCode::BookingCancelled)
            .with_detail("booking_code", booking.booking_code.as_str())
            .into());
    }
    Ok(booking)
}

fn exceeds_balance(amount: f64, balance: f64) -> AppError {
    AppError::with_message(
        ErrorCode::PaymentExceedsBalance,
        format!("Payment of {amount:.2} exceeds the outstanding balance of {balance:.2}"),
    )
    .with_detail("amount", amount)
    .with_detail("balance", balance)
}

/// GET /api/payments
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PaymentListQuery>,
) -> ApiResult<PaginatedResponse<Payment>> {
    let page = db::payments::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/payments/due
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<PaymentDueQuery>,
) -> ApiResult<Vec<PaymentDueEntry>> {
    if query.within_days.is_some_and(|d| d < 0) {
        return Err(AppError::field("within_days", "within_days must not be negative").into());
    }
    let entries = payments_due(&state.pool, query.within_days, shared::util::today()).await?;
    Ok(Json(entries))
}

/// GET /api/payments/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Payment> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/payments
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PaymentCreate>,
) -> ApiResult<Payment> {
    validate_amount(payload.amount)?;
    validate_fields(&payload.reference, &payload.notes)?;
    let row = PaymentRow {
        amount: payload.amount,
        method: payload.method,
        reference: payload.reference.as_deref(),
        paid_at: payload.paid_at.unwrap_or_else(shared::util::today),
        notes: payload.notes.as_deref(),
    };

    let mut tx = state.pool.begin().await?;
    let booking = payable_booking(&mut tx, payload.booking_id).await?;
    if row.amount > booking.balance + AMOUNT_TOLERANCE {
        return Err(exceeds_balance(row.amount, booking.balance).into());
    }
    let (id, code) = db::payments::insert(&mut tx, booking.id, &row, Some(current_user.id)).await?;
    db::bookings::recompute_balance(&mut tx, booking.id).await?;
    tx.commit().await?;

    tracing::info!(
        payment_id = id,
        payment_code = %code,
        booking_code = %booking.booking_code,
        amount = row.amount,
        method = %row.method,
        by = current_user.id,
        "Payment recorded"
    );
    Ok(Json(load(&state, id).await?))
}

/// PUT /api/payments/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> ApiResult<Payment> {
    if let Some(amount) = payload.amount {
        validate_amount(amount)?;
    }
    validate_fields(
        &nullable_value(&payload.reference),
        &nullable_value(&payload.notes),
    )?;

    let mut tx = state.pool.begin().await?;
    let existing = db::payments::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let booking = payable_booking(&mut tx, existing.booking_id).await?;

    let row = PaymentRow {
        amount: payload.amount.unwrap_or(existing.amount),
        method: payload.method.unwrap_or(existing.method),
        reference: patched_text(&payload.reference, &existing.reference),
        paid_at: payload.paid_at.unwrap_or(existing.paid_at),
        notes: patched_text(&payload.notes, &existing.notes),
    };
    // the payment's own amount is already part of paid_amount
    let available = booking.balance + existing.amount;
    if row.amount > available + AMOUNT_TOLERANCE {
        return Err(exceeds_balance(row.amount, available).into());
    }
    db::payments::update(&mut tx, id, &row).await?;
    db::bookings::recompute_balance(&mut tx, booking.id).await?;
    tx.commit().await?;

    if (row.amount - existing.amount).abs() > f64::EPSILON {
        tracing::info!(
            payment_id = id,
            from = existing.amount,
            to = row.amount,
            by = current_user.id,
            "Payment amount changed"
        );
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/payments/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let mut tx = state.pool.begin().await?;
    let payment = db::payments::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !db::payments::delete(&mut tx, id).await? {
        return Err(not_found(id).into());
    }
    db::bookings::recompute_balance(&mut tx, payment.booking_id).await?;
    tx.commit().await?;

    tracing::info!(
        payment_id = id,
        payment_code = %payment.payment_code,
        amount = payment.amount,
        by = current_user.id,
        "Payment deleted"
    );
    Ok(Json(true))
}
