//! Booking API Handlers
//!
//! Totals are always derived server-side from the resolved items and dinner
//! package. Every write that touches the slot runs the conflict check on the
//! same transaction as the write itself.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Booking, BookingCreate, BookingDetail, BookingListQuery, BookingStatus, BookingUpdate,
};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::db::bookings::BookingRow;
use crate::error::{ServiceResult, unique_or};
use crate::services::bookings::{
    ensure_customer, ensure_hall_bookable, ensure_not_past, ensure_slot_free, load_detail,
    slot_taken,
};
use crate::services::pricing::{self, PricedItem, PricedPackage, Pricing};
use crate::state::AppState;
use crate::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, nullable_value, patched_text, validate_optional_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::BookingNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<Booking> {
    Ok(db::bookings::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_fields(
    event_type: &Option<String>,
    guest_count: Option<i32>,
    notes: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(event_type, "event_type", MAX_SHORT_TEXT_LEN)?;
    if guest_count.is_some_and(|g| g < 0) {
        return Err(AppError::field(
            "guest_count",
            "guest_count must not be negative",
        ));
    }
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

fn terminal_error(booking: &Booking) -> AppError {
    let code = match booking.status {
        BookingStatus::Completed => ErrorCode::BookingCompleted,
        _ => ErrorCode::BookingCancelled,
    };
    AppError::new(code).with_detail("booking_code", booking.booking_code.as_str())
}

fn invalid_transition(from: BookingStatus, to: BookingStatus) -> AppError {
    AppError::with_message(
        ErrorCode::BookingInvalidStatus,
        format!("Cannot change booking status from {from} to {to}"),
    )
    .with_detail("from", from.as_str())
    .with_detail("to", to.as_str())
}

/// GET /api/bookings
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> ApiResult<PaginatedResponse<Booking>> {
    let page = db::bookings::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/bookings/{id} - booking with items, package, payments and due status
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BookingDetail> {
    Ok(Json(load_detail(&state.pool, id).await?))
}

/// POST /api/bookings
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> ApiResult<BookingDetail> {
    validate_fields(&payload.event_type, payload.guest_count, &payload.notes)?;
    let status = payload.status.unwrap_or_default();
    if status.is_terminal() {
        return Err(invalid_transition(BookingStatus::Pending, status).into());
    }
    ensure_customer(&state.pool, payload.customer_id).await?;
    ensure_hall_bookable(&state.pool, payload.hall_id).await?;
    ensure_not_past(payload.event_date, shared::util::today())?;

    let items = pricing::resolve_items(&state.pool, &payload.items).await?;
    let package = pricing::resolve_package(&state.pool, payload.dinner_package).await?;
    let pricing = Pricing::new(items, package);

    let row = BookingRow {
        customer_id: payload.customer_id,
        hall_id: payload.hall_id,
        event_date: payload.event_date,
        time_slot: payload.time_slot,
        event_type: payload.event_type.as_deref(),
        guest_count: payload.guest_count,
        status,
        notes: payload.notes.as_deref(),
    };

    let mut tx = state.pool.begin().await?;
    ensure_slot_free(&mut tx, row.hall_id, row.event_date, row.time_slot, None).await?;
    let (id, code) = db::bookings::insert(&mut tx, &row, &pricing, None, Some(current_user.id))
        .await
        .map_err(|e| unique_or(e, slot_taken(row.hall_id, row.event_date, row.time_slot, None)))?;
    tx.commit().await?;

    tracing::info!(
        booking_id = id,
        booking_code = %code,
        hall_id = row.hall_id,
        event_date = %row.event_date,
        time_slot = %row.time_slot,
        total = pricing.total_amount,
        by = current_user.id,
        "Booking created"
    );
    Ok(Json(load_detail(&state.pool, id).await?))
}

/// PUT /api/bookings/{id}
///
/// Absent fields keep their stored value. `items` replaces every line item
/// when present; `dinner_package: null` removes the package.
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<BookingUpdate>,
) -> ApiResult<BookingDetail> {
    let existing = load(&state, id).await?;
    if existing.status.is_terminal() {
        return Err(terminal_error(&existing).into());
    }
    validate_fields(
        &nullable_value(&payload.event_type),
        payload.guest_count.flatten(),
        &nullable_value(&payload.notes),
    )?;

    let status = payload.status.unwrap_or(existing.status);
    if !existing.status.can_transition_to(status) {
        return Err(invalid_transition(existing.status, status).into());
    }

    let customer_id = payload.customer_id.unwrap_or(existing.customer_id);
    if customer_id != existing.customer_id {
        ensure_customer(&state.pool, customer_id).await?;
    }
    let hall_id = payload.hall_id.unwrap_or(existing.hall_id);
    if hall_id != existing.hall_id {
        ensure_hall_bookable(&state.pool, hall_id).await?;
    }
    let event_date = payload.event_date.unwrap_or(existing.event_date);
    if event_date != existing.event_date {
        ensure_not_past(event_date, shared::util::today())?;
    }
    let time_slot = payload.time_slot.unwrap_or(existing.time_slot);

    let items = match &payload.items {
        Some(inputs) => pricing::resolve_items(&state.pool, inputs).await?,
        None => db::bookings::items(&state.pool, id)
            .await?
            .iter()
            .map(PricedItem::from)
            .collect(),
    };
    let package = match payload.dinner_package {
        Some(selection) => pricing::resolve_package(&state.pool, selection).await?,
        None => db::bookings::dinner_package(&state.pool, id)
            .await?
            .as_ref()
            .map(PricedPackage::from),
    };
    let pricing = Pricing::new(items, package);

    let row = BookingRow {
        customer_id,
        hall_id,
        event_date,
        time_slot,
        event_type: patched_text(&payload.event_type, &existing.event_type),
        guest_count: payload.guest_count.unwrap_or(existing.guest_count),
        status,
        notes: patched_text(&payload.notes, &existing.notes),
    };

    let mut tx = state.pool.begin().await?;
    // paid amount as seen by this transaction
    let paid_amount = db::bookings::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| not_found(id))?
        .paid_amount;
    if pricing.total_amount + 0.005 < paid_amount {
        return Err(AppError::with_message(
            ErrorCode::BookingTotalBelowPaid,
            format!(
                "New total {:.2} is below the {:.2} already paid",
                pricing.total_amount, paid_amount
            ),
        )
        .with_detail("total_amount", pricing.total_amount)
        .with_detail("paid_amount", paid_amount)
        .into());
    }
    if status != BookingStatus::Cancelled {
        ensure_slot_free(&mut tx, hall_id, event_date, time_slot, Some(id)).await?;
    }
    db::bookings::update(
        &mut tx,
        id,
        &row,
        pricing.subtotal,
        pricing.dinner_total,
        pricing.total_amount,
    )
    .await
    .map_err(|e| unique_or(e, slot_taken(hall_id, event_date, time_slot, None)))?;
    if payload.items.is_some() {
        db::bookings::replace_items(&mut tx, id, &pricing.items).await?;
    }
    if payload.dinner_package.is_some() {
        db::bookings::replace_package(&mut tx, id, pricing.package.as_ref()).await?;
    }
    tx.commit().await?;

    if status != existing.status {
        tracing::info!(
            booking_id = id,
            from = %existing.status,
            to = %status,
            by = current_user.id,
            "Booking status changed"
        );
    }
    Ok(Json(load_detail(&state.pool, id).await?))
}

/// DELETE /api/bookings/{id} - soft delete; refused once payments exist
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let booking = load(&state, id).await?;
    if db::bookings::has_payments(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::BookingHasPayments)
            .with_detail("booking_code", booking.booking_code.as_str())
            .into());
    }
    if !db::bookings::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(booking_id = id, booking_code = %booking.booking_code, by = current_user.id, "Booking deleted");
    Ok(Json(true))
}
