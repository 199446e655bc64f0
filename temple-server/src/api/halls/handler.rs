//! Hall API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AvailabilityQuery, Hall, HallAvailability, HallCreate, HallListQuery, HallUpdate,
    SlotAvailability, TimeSlot,
};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ServiceResult, unique_or};
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, nullable_value, validate_amount, validate_optional_text,
    validate_required_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::HallNotFound).with_detail("id", id)
}

fn name_exists(name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::HallNameExists,
        format!("A hall named '{}' already exists", name.trim()),
    )
    .with_detail("name", name.trim())
}

async fn load(state: &AppState, id: i64) -> ServiceResult<Hall> {
    Ok(db::halls::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_fields(
    capacity: Option<i32>,
    location: &Option<String>,
    base_price: Option<f64>,
    description: &Option<String>,
) -> Result<(), AppError> {
    if capacity.is_some_and(|c| c < 0) {
        return Err(AppError::field("capacity", "capacity must not be negative"));
    }
    validate_optional_text(location, "location", MAX_NAME_LEN)?;
    if let Some(price) = base_price {
        validate_amount(price, "base_price")?;
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/halls
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HallListQuery>,
) -> ApiResult<PaginatedResponse<Hall>> {
    let page = db::halls::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/halls/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Hall> {
    Ok(Json(load(&state, id).await?))
}

/// GET /api/halls/{id}/availability?date=YYYY-MM-DD
///
/// A slot is taken when a live booking holds it, or holds the full day.
/// The full day is free only when nothing at all is booked.
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<HallAvailability> {
    load(&state, id).await?;
    let booked = db::bookings::booked_slots(&state.pool, id, query.date).await?;

    let slots = TimeSlot::ALL
        .into_iter()
        .map(|slot| {
            let holder = booked.iter().find(|(taken, _)| taken.overlaps(&slot));
            SlotAvailability {
                time_slot: slot,
                available: holder.is_none(),
                booking_code: holder.map(|(_, code)| code.clone()),
            }
        })
        .collect();

    Ok(Json(HallAvailability {
        hall_id: id,
        date: query.date,
        slots,
    }))
}

/// POST /api/halls
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<HallCreate>,
) -> ApiResult<Hall> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(
        payload.capacity,
        &payload.location,
        payload.base_price,
        &payload.description,
    )?;
    if db::halls::name_taken(&state.pool, &payload.name, None).await? {
        return Err(name_exists(&payload.name).into());
    }

    let id = db::halls::create(&state.pool, &payload)
        .await
        .map_err(|e| unique_or(e, name_exists(&payload.name)))?;
    tracing::info!(hall_id = id, by = current_user.id, "Hall created");
    Ok(Json(load(&state, id).await?))
}

/// PUT /api/halls/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<HallUpdate>,
) -> ApiResult<Hall> {
    load(&state, id).await?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
        if db::halls::name_taken(&state.pool, name, Some(id)).await? {
            return Err(name_exists(name).into());
        }
    }
    validate_fields(
        payload.capacity,
        &nullable_value(&payload.location),
        payload.base_price,
        &nullable_value(&payload.description),
    )?;

    let name = payload.name.clone().unwrap_or_default();
    if !db::halls::update(&state.pool, id, &payload)
        .await
        .map_err(|e| unique_or(e, name_exists(&name)))?
    {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/halls/{id} - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::halls::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(hall_id = id, by = current_user.id, "Hall deleted");
    Ok(Json(true))
}
