//! User API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User, UserCreate, UserListQuery, UserResponse, UserUpdate};
use shared::response::{PageRequest, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::{CurrentUser, hash_password};
use crate::db;
use crate::db::users::UserRow;
use crate::error::{ServiceResult, unique_or};
use crate::security_log;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};

async fn load(state: &AppState, id: i64) -> ServiceResult<User> {
    Ok(db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("id", id))?)
}

/// Only a super admin may touch a super admin account
fn guard_super_admin(current_user: &CurrentUser, role: Role) -> Result<(), AppError> {
    if role == Role::SuperAdmin && !current_user.is_super_admin() {
        return Err(AppError::new(ErrorCode::CannotModifySuperAdmin));
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<PaginatedResponse<UserResponse>> {
    let page = db::users::list(&state.pool, &query).await?;
    let (p, per_page) = PageRequest::new(query.page, query.per_page).resolve();
    let items = page.items.into_iter().map(UserResponse::from).collect();
    Ok(Json(PaginatedResponse::new(items, p, per_page, page.total)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<UserResponse> {
    Ok(Json(load(&state, id).await?.into()))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> ApiResult<UserResponse> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(payload.email.trim(), "email")?;
    validate_password(&payload.password)?;
    guard_super_admin(&current_user, payload.role)?;

    let password_hash = hash(&payload.password)?;
    let email = payload.email.trim();
    let id = db::users::create(
        &state.pool,
        UserRow {
            name: payload.name.trim(),
            email,
            password_hash: &password_hash,
            role: payload.role,
            is_active: payload.is_active.unwrap_or(true),
        },
    )
    .await
    .map_err(|e| unique_or(e, AppError::new(ErrorCode::UserEmailExists).with_detail("email", email)))?;

    security_log!(
        INFO,
        "user_created",
        user_id = id,
        role = %payload.role,
        by = current_user.id
    );
    Ok(Json(load(&state, id).await?.into()))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<UserResponse> {
    let existing = load(&state, id).await?;
    guard_super_admin(&current_user, existing.role)?;
    if let Some(role) = payload.role {
        guard_super_admin(&current_user, role)?;
    }

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email.trim(), "email")?;
    }
    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            hash(password)?
        }
        None => existing.password_hash.clone(),
    };

    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or(&existing.email);
    db::users::update(
        &state.pool,
        id,
        UserRow {
            name: payload.name.as_deref().map(str::trim).unwrap_or(&existing.name),
            email,
            password_hash: &password_hash,
            role: payload.role.unwrap_or(existing.role),
            is_active: payload.is_active.unwrap_or(existing.is_active),
        },
    )
    .await
    .map_err(|e| unique_or(e, AppError::new(ErrorCode::UserEmailExists).with_detail("email", email)))?;

    if payload.role.is_some_and(|r| r != existing.role) {
        security_log!(
            INFO,
            "user_role_changed",
            user_id = id,
            from = %existing.role,
            to = ?payload.role,
            by = current_user.id
        );
    }
    Ok(Json(load(&state, id).await?.into()))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if id == current_user.id {
        return Err(AppError::new(ErrorCode::UserCannotDeleteSelf).into());
    }
    let existing = load(&state, id).await?;
    guard_super_admin(&current_user, existing.role)?;

    let deleted = db::users::delete(&state.pool, id).await?;
    if deleted {
        security_log!(INFO, "user_deleted", user_id = id, by = current_user.id);
    }
    Ok(Json(deleted))
}
