//! Devotee API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Devotee, DevoteeCreate, DevoteeListQuery, DevoteeUpdate};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email,
    nullable_value, validate_optional_text, validate_required_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::DevoteeNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<Devotee> {
    Ok(db::devotees::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_fields(
    chinese_name: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    address: &Option<String>,
    notes: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(chinese_name, "chinese_name", MAX_NAME_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_email(email, "email")?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/devotees
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DevoteeListQuery>,
) -> ApiResult<PaginatedResponse<Devotee>> {
    let page = db::devotees::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/devotees/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Devotee> {
    Ok(Json(load(&state, id).await?))
}

/// POST /api/devotees
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<DevoteeCreate>,
) -> ApiResult<Devotee> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(
        &payload.chinese_name,
        &payload.phone,
        &payload.email,
        &payload.address,
        &payload.notes,
    )?;

    let id = db::devotees::create(&state.pool, &payload).await?;
    let devotee = load(&state, id).await?;
    tracing::info!(
        devotee_id = id,
        code = %devotee.devotee_code,
        by = current_user.id,
        "Devotee registered"
    );
    Ok(Json(devotee))
}

/// PUT /api/devotees/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DevoteeUpdate>,
) -> ApiResult<Devotee> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_fields(
        &nullable_value(&payload.chinese_name),
        &nullable_value(&payload.phone),
        &nullable_value(&payload.email),
        &nullable_value(&payload.address),
        &nullable_value(&payload.notes),
    )?;

    if !db::devotees::update(&state.pool, id, &payload).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/devotees/{id} - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::devotees::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(devotee_id = id, by = current_user.id, "Devotee deleted");
    Ok(Json(true))
}
