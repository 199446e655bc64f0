//! Customer API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerCreate, CustomerDetail, CustomerListQuery, CustomerUpdate};
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
    AppError::new(ErrorCode::CustomerNotFound).with_detail("id", id)
}

async fn load(state: &AppState, id: i64) -> ServiceResult<Customer> {
    Ok(db::customers::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?)
}

fn validate_contact(
    phone: &Option<String>,
    email: &Option<String>,
    address: &Option<String>,
    ic_number: &Option<String>,
    notes: &Option<String>,
) -> Result<(), AppError> {
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_email(email, "email")?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)?;
    validate_optional_text(ic_number, "ic_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// GET /api/customers
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<PaginatedResponse<Customer>> {
    let page = db::customers::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    Ok(Json(PaginatedResponse::new(page.items, p, per_page, page.total)))
}

/// GET /api/customers/{id} - customer with their bookings
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CustomerDetail> {
    let customer = load(&state, id).await?;
    let bookings = db::bookings::list_for_customer(&state.pool, id).await?;
    Ok(Json(CustomerDetail { customer, bookings }))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CustomerCreate>,
) -> ApiResult<Customer> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_contact(
        &payload.phone,
        &payload.email,
        &payload.address,
        &payload.ic_number,
        &payload.notes,
    )?;

    let id = db::customers::create(&state.pool, &payload).await?;
    let customer = load(&state, id).await?;
    tracing::info!(
        customer_id = id,
        code = %customer.customer_code,
        by = current_user.id,
        "Customer created"
    );
    Ok(Json(customer))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> ApiResult<Customer> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_contact(
        &nullable_value(&payload.phone),
        &nullable_value(&payload.email),
        &nullable_value(&payload.address),
        &nullable_value(&payload.ic_number),
        &nullable_value(&payload.notes),
    )?;

    if !db::customers::update(&state.pool, id, &payload).await? {
        return Err(not_found(id).into());
    }
    Ok(Json(load(&state, id).await?))
}

/// DELETE /api/customers/{id} - soft delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !db::customers::soft_delete(&state.pool, id).await? {
        return Err(not_found(id).into());
    }
    tracing::info!(customer_id = id, by = current_user.id, "Customer deleted");
    Ok(Json(true))
}
