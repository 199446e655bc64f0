//! Dinner Package API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DinnerPackage, DinnerPackageCreate, DinnerPackageListQuery, DinnerPackageUpdate,
};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, nullable_value, validate_amount, validate_optional_text,
    validate_required_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::DinnerPackageNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<DinnerPackage> {
    Ok(db::dinner_packages::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

async fn ensure_vendor(state: &AppState, vendor_id: i64) -> ServiceResult<()> {
    db::catering_vendors::find_by_id(&state.pool, vendor_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::CateringVendorNotFound)
                .with_detail("catering_vendor_id", vendor_id)
        })?;
    Ok(())
}

fn validate_fields(
    price_per_table: Option<f64>,
    min_tables: Option<i32>,
    description: &Option<String>,
) -> Result<(), AppError> {
    if let Some(price) = price_per_table {
        validate_amount(price, "price_per_table")?;
    }
    if min_tables.is_some_and(|m| m < 1) {
        return Err(AppError::field("min_tables", "min_tables must be at least 1"));
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/dinner-packages
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DinnerPackageListQuery>,
) -> ApiResult<PaginatedResponse<DinnerPackage>> {
    let page = db::dinner_packages::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/dinner-packages/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DinnerPackage> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/dinner-packages
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<DinnerPackageCreate>,
) -> ApiResult<DinnerPackage> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(
        Some(payload.price_per_table),
        payload.min_tables,
        &payload.description,
    )?;
    ensure_vendor(&state, payload.catering_vendor_id).await?;

    let id = db::dinner_packages::create(&state.pool, &payload).await?;
    Ok(Json(load(&state, id).await?))
}

/// PUT /api/dinner-packages/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DinnerPackageUpdate>,
) -> ApiResult<DinnerPackage> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_fields(
        payload.price_per_table,
        payload.min_tables,
        &nullable_value(&payload.description),
    )?;
    if let Some(vendor_id) = payload.catering_vendor_id {
        ensure_vendor(&state, vendor_id).await?;
    }

    if !db::dinner_packages::update(&state.pool, id, &payload).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/dinner-packages/{id}
///
/// Packages recorded on bookings or quotations can only be deactivated.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    load(&state, id).await?;
    if db::dinner_packages::is_referenced(&state.pool, id).await? {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Dinner package is used by bookings or quotations; deactivate it instead",
        )
        .with_detail("id", id)
        .into());
    }
    Ok(Json(db::dinner_packages::delete(&state.pool, id).await?))
}
