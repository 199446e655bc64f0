//! Catering Vendor API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CateringVendor, CateringVendorCreate, CateringVendorDetail, CateringVendorListQuery,
    CateringVendorUpdate,
};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_email,
    nullable_value, validate_optional_text, validate_required_text,
};

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CateringVendorNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<CateringVendor> {
    Ok(db::catering_vendors::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_fields(
    contact_person: &Option<String>,
    phone: &Option<String>,
    email: &Option<String>,
    address: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(contact_person, "contact_person", MAX_NAME_LEN)?;
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_email(email, "email")?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    Ok(())
}

/// GET /api/catering-vendors
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CateringVendorListQuery>,
) -> ApiResult<PaginatedResponse<CateringVendor>> {
    let page = db::catering_vendors::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/catering-vendors/{id} - vendor with its packages
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CateringVendorDetail> {
    let vendor = load(&state, id).await?;
    let packages = db::dinner_packages::list_for_vendor(&state.pool, id).await?;
    Ok(Json(CateringVendorDetail { vendor, packages }))
}

/// POST /api/catering-vendors
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CateringVendorCreate>,
) -> ApiResult<CateringVendor> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_fields(
        &payload.contact_person,
        &payload.phone,
        &payload.email,
        &payload.address,
    )?;

    let id = db::catering_vendors::create(&state.pool, &payload).await?;
    Ok(Json(load(&state, id).await?))
}

/// PUT /api/catering-vendors/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CateringVendorUpdate>,
) -> ApiResult<CateringVendor> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_fields(
        &nullable_value(&payload.contact_person),
        &nullable_value(&payload.phone),
        &nullable_value(&payload.email),
        &nullable_value(&payload.address),
    )?;

    if !db::catering_vendors::update(&state.pool, id, &payload).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/catering-vendors/{id} - refused while packages reference the vendor
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    load(&state, id).await?;
    let packages = db::catering_vendors::count_packages(&state.pool, id).await?;
    if packages > 0 {
        return Err(AppError::new(ErrorCode::CateringVendorHasPackages)
            .with_detail("package_count", packages)
            .into());
    }
    Ok(Json(db::catering_vendors::delete(&state.pool, id).await?))
}
