//! Billing Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{BillingItem, BillingItemCreate, BillingItemListQuery, BillingItemUpdate};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, nullable_value, validate_amount,
    validate_optional_text, validate_required_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::BillingItemNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<BillingItem> {
    Ok(db::billing_items::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_fields(
    category: &Option<String>,
    unit: &Option<String>,
    unit_price: Option<f64>,
    description: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(unit, "unit", MAX_SHORT_TEXT_LEN)?;
    if let Some(price) = unit_price {
        validate_amount(price, "unit_price")?;
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/billing-items
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<BillingItemListQuery>,
) -> ApiResult<PaginatedResponse<BillingItem>> {
    let page = db::billing_items::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/billing-items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<BillingItem> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/billing-items
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BillingItemCreate>,
) -> ApiResult<BillingItem> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(
        &payload.category,
        &payload.unit,
        Some(payload.unit_price),
        &payload.description,
    )?;

    let id = db::billing_items::create(&state.pool, &payload).await?;
    Ok(Json(load(&state, id).await?))
}

/// PUT /api/billing-items/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BillingItemUpdate>,
) -> ApiResult<BillingItem> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_fields(
        &nullable_value(&payload.category),
        &nullable_value(&payload.unit),
        payload.unit_price,
        &nullable_value(&payload.description),
    )?;

    if !db::billing_items::update(&state.pool, id, &payload).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/billing-items/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    if !db::billing_items::delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(true))
}
