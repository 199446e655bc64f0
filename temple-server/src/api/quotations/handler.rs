//! Quotation API Handlers
//!
//! Status reads always go through [`QuotationStatus::effective`], so a draft
//! or sent quotation past `valid_until` is reported and treated as expired.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use chrono::{Duration, NaiveDate};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingDetail, BookingStatus, DEFAULT_QUOTATION_VALIDITY_DAYS, Quotation, QuotationCreate,
    QuotationDetail, QuotationListQuery, QuotationStatus, QuotationUpdate,
    SETTING_QUOTATION_VALIDITY_DAYS,
};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::db::bookings::BookingRow;
use crate::db::quotations::QuotationRow;
use crate::error::{ServiceResult, unique_or};
use crate::services::bookings::{
    ensure_customer, ensure_hall_bookable, ensure_not_past, ensure_slot_free, load_detail,
    slot_taken,
};
use crate::services::pricing::{self, PricedItem, PricedPackage, Pricing};
use crate::state::AppState;
use crate::validation::{MAX_NOTE_LEN, nullable_value, patched_text, validate_optional_text};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::QuotationNotFound).with_detail("id", id)
}

/// Stored row with its effective status applied
async fn load(state: &AppState, id: i64) -> ServiceResult<Quotation> {
    let quotation = db::quotations::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(quotation.with_effective_status(shared::util::today()))
}

async fn load_detail_of(state: &AppState, id: i64) -> ServiceResult<QuotationDetail> {
    let quotation = load(state, id).await?;
    let items = db::quotations::items(&state.pool, id).await?;
    Ok(QuotationDetail { quotation, items })
}

fn status_error(quotation: &Quotation, action: &str) -> AppError {
    let err = match quotation.status {
        QuotationStatus::Expired => AppError::new(ErrorCode::QuotationExpired),
        QuotationStatus::Converted => AppError::new(ErrorCode::QuotationAlreadyConverted),
        status => AppError::with_message(
            ErrorCode::QuotationInvalidStatus,
            format!("Cannot {action} a quotation that is {status}"),
        ),
    };
    err.with_detail("quotation_code", quotation.quotation_code.as_str())
        .with_detail("status", quotation.status.as_str())
}

fn validate_valid_until(valid_until: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if valid_until < today {
        return Err(AppError::field(
            "valid_until",
            "valid_until must not be in the past",
        ));
    }
    Ok(())
}

/// GET /api/quotations
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<QuotationListQuery>,
) -> ApiResult<PaginatedResponse<Quotation>> {
    let page = db::quotations::list(&state.pool, &query, shared::util::today()).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/quotations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<QuotationDetail> {
    Ok(Json(load_detail_of(&state, id).await?))
}

/// POST /api/quotations - new drafts only
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<QuotationCreate>,
) -> ApiResult<QuotationDetail> {
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    let today = shared::util::today();
    ensure_customer(&state.pool, payload.customer_id).await?;
    ensure_hall_bookable(&state.pool, payload.hall_id).await?;
    ensure_not_past(payload.event_date, today)?;

    let valid_until = match payload.valid_until {
        Some(date) => date,
        None => {
            let days = db::system_settings::get_i64(
                &state.pool,
                SETTING_QUOTATION_VALIDITY_DAYS,
                DEFAULT_QUOTATION_VALIDITY_DAYS,
            )
            .await?;
            today + Duration::days(days.max(0))
        }
    };
    validate_valid_until(valid_until, today)?;

    let items = pricing::resolve_items(&state.pool, &payload.items).await?;
    let package = pricing::resolve_package(&state.pool, payload.dinner_package).await?;
    let pricing = Pricing::new(items, package);

    let row = QuotationRow {
        customer_id: payload.customer_id,
        hall_id: payload.hall_id,
        event_date: payload.event_date,
        time_slot: payload.time_slot,
        valid_until,
        notes: payload.notes.as_deref(),
    };
    let mut tx = state.pool.begin().await?;
    let id = db::quotations::insert(&mut tx, &row, &pricing, Some(current_user.id)).await?;
    tx.commit().await?;

    tracing::info!(
        quotation_id = id,
        total = pricing.total_amount,
        by = current_user.id,
        "Quotation created"
    );
    Ok(Json(load_detail_of(&state, id).await?))
}

/// PUT /api/quotations/{id}
///
/// Draft, sent and expired quotations stay editable; moving `valid_until`
/// forward revives an expired one.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<QuotationUpdate>,
) -> ApiResult<QuotationDetail> {
    let existing = load(&state, id).await?;
    if !matches!(
        existing.status,
        QuotationStatus::Draft | QuotationStatus::Sent | QuotationStatus::Expired
    ) {
        return Err(status_error(&existing, "edit").into());
    }
    validate_optional_text(&nullable_value(&payload.notes), "notes", MAX_NOTE_LEN)?;
    let today = shared::util::today();

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
        ensure_not_past(event_date, today)?;
    }
    let valid_until = payload.valid_until.unwrap_or(existing.valid_until);
    if let Some(date) = payload.valid_until {
        validate_valid_until(date, today)?;
    }

    let items = match &payload.items {
        Some(inputs) => pricing::resolve_items(&state.pool, inputs).await?,
        None => db::quotations::items(&state.pool, id)
            .await?
            .iter()
            .map(PricedItem::from)
            .collect(),
    };
    let package = match payload.dinner_package {
        Some(selection) => pricing::resolve_package(&state.pool, selection).await?,
        None => stored_package(&state, &existing).await?,
    };
    let pricing = Pricing::new(items, package);

    let row = QuotationRow {
        customer_id,
        hall_id,
        event_date,
        time_slot: payload.time_slot.unwrap_or(existing.time_slot),
        valid_until,
        notes: patched_text(&payload.notes, &existing.notes),
    };
    let mut tx = state.pool.begin().await?;
    db::quotations::update(&mut tx, id, &row, &pricing).await?;
    if payload.items.is_some() {
        db::quotations::replace_items(&mut tx, id, &pricing.items).await?;
    }
    tx.commit().await?;

    Ok(Json(load_detail_of(&state, id).await?))
}

/// Package priced from the columns stored on the quotation
async fn stored_package(
    state: &AppState,
    quotation: &Quotation,
) -> ServiceResult<Option<PricedPackage>> {
    let (Some(package_id), Some(tables), Some(price)) = (
        quotation.dinner_package_id,
        quotation.table_count,
        quotation.dinner_price_per_table,
    ) else {
        return Ok(None);
    };
    let name = db::dinner_packages::find_by_id(&state.pool, package_id)
        .await?
        .map_or_else(|| format!("Dinner package #{package_id}"), |p| p.name);
    Ok(Some(PricedPackage::new(package_id, name, tables, price)))
}

/// DELETE /api/quotations/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    let existing = load(&state, id).await?;
    if existing.status == QuotationStatus::Converted {
        return Err(status_error(&existing, "delete").into());
    }
    if !db::quotations::delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(
        quotation_id = id,
        quotation_code = %existing.quotation_code,
        by = current_user.id,
        "Quotation deleted"
    );
    Ok(Json(true))
}

async fn transition(
    state: &AppState,
    current_user: &CurrentUser,
    id: i64,
    action: &str,
    allowed: &[QuotationStatus],
    next: QuotationStatus,
) -> ServiceResult<QuotationDetail> {
    let existing = load(state, id).await?;
    if !allowed.contains(&existing.status) {
        return Err(status_error(&existing, action).into());
    }
    if !db::quotations::set_status(&state.pool, id, allowed, next).await? {
        // a concurrent request moved it first
        let current = load(state, id).await?;
        return Err(status_error(&current, action).into());
    }
    tracing::info!(
        quotation_id = id,
        from = %existing.status,
        to = %next,
        by = current_user.id,
        "Quotation status changed"
    );
    load_detail_of(state, id).await
}

/// POST /api/quotations/{id}/send
pub async fn send(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<QuotationDetail> {
    let detail = transition(
        &state,
        &current_user,
        id,
        "send",
        &[QuotationStatus::Draft],
        QuotationStatus::Sent,
    )
    .await?;
    Ok(Json(detail))
}

/// POST /api/quotations/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<QuotationDetail> {
    let detail = transition(
        &state,
        &current_user,
        id,
        "accept",
        &[QuotationStatus::Draft, QuotationStatus::Sent],
        QuotationStatus::Accepted,
    )
    .await?;
    Ok(Json(detail))
}

/// POST /api/quotations/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<QuotationDetail> {
    let detail = transition(
        &state,
        &current_user,
        id,
        "reject",
        &[
            QuotationStatus::Draft,
            QuotationStatus::Sent,
            QuotationStatus::Accepted,
        ],
        QuotationStatus::Rejected,
    )
    .await?;
    Ok(Json(detail))
}

/// POST /api/quotations/{id}/convert
///
/// Turns an accepted quotation into a pending booking carrying the quoted
/// items and package at the quoted prices.
pub async fn convert(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<BookingDetail> {
    let quotation = load(&state, id).await?;
    match quotation.status {
        QuotationStatus::Accepted => {}
        QuotationStatus::Converted | QuotationStatus::Expired => {
            return Err(status_error(&quotation, "convert").into());
        }
        _ => {
            return Err(AppError::new(ErrorCode::QuotationNotAccepted)
                .with_detail("quotation_code", quotation.quotation_code.as_str())
                .with_detail("status", quotation.status.as_str())
                .into());
        }
    }
    ensure_customer(&state.pool, quotation.customer_id).await?;
    ensure_hall_bookable(&state.pool, quotation.hall_id).await?;
    ensure_not_past(quotation.event_date, shared::util::today())?;

    let items = db::quotations::items(&state.pool, id)
        .await?
        .iter()
        .map(PricedItem::from)
        .collect();
    let package = stored_package(&state, &quotation).await?;
    let pricing = Pricing::new(items, package);

    let row = BookingRow {
        customer_id: quotation.customer_id,
        hall_id: quotation.hall_id,
        event_date: quotation.event_date,
        time_slot: quotation.time_slot,
        event_type: None,
        guest_count: None,
        status: BookingStatus::Pending,
        notes: quotation.notes.as_deref(),
    };

    let mut tx = state.pool.begin().await?;
    ensure_slot_free(&mut tx, row.hall_id, row.event_date, row.time_slot, None).await?;
    let (booking_id, booking_code) =
        db::bookings::insert(&mut tx, &row, &pricing, Some(id), Some(current_user.id))
            .await
            .map_err(|e| {
                unique_or(e, slot_taken(row.hall_id, row.event_date, row.time_slot, None))
            })?;
    if !db::quotations::mark_converted(&mut tx, id, booking_id).await? {
        tx.rollback().await?;
        let current = load(&state, id).await?;
        return Err(status_error(&current, "convert").into());
    }
    tx.commit().await?;

    tracing::info!(
        quotation_id = id,
        quotation_code = %quotation.quotation_code,
        booking_id,
        booking_code = %booking_code,
        by = current_user.id,
        "Quotation converted to booking"
    );
    Ok(Json(load_detail(&state.pool, booking_id).await?))
}
