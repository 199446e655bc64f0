//! System Settings API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    SETTING_PAYMENT_DUE_DAYS, SETTING_QUOTATION_VALIDITY_DAYS, SystemSetting, SystemSettingQuery,
    SystemSettingUpsert,
};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};

/// Settings the server itself reads as day counts
const DAY_COUNT_KEYS: &[&str] = &[SETTING_PAYMENT_DUE_DAYS, SETTING_QUOTATION_VALIDITY_DAYS];

fn not_found(key: &str) -> AppError {
    AppError::new(ErrorCode::SettingNotFound).with_detail("key", key)
}

fn validate_value(key: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_NOTE_LEN {
        return Err(AppError::field(
            "value",
            format!("value is too long (max {MAX_NOTE_LEN} characters)"),
        ));
    }
    if DAY_COUNT_KEYS.contains(&key) && !value.trim().parse::<i64>().is_ok_and(|d| d >= 0) {
        return Err(AppError::field(
            "value",
            format!("{key} must be a whole number of days"),
        ));
    }
    Ok(())
}

/// GET /api/settings?group=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SystemSettingQuery>,
) -> ApiResult<Vec<SystemSetting>> {
    Ok(Json(
        db::system_settings::list(&state.pool, query.group.as_deref()).await?,
    ))
}

/// GET /api/settings/{key}
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<SystemSetting> {
    let setting = db::system_settings::get(&state.pool, &key)
        .await?
        .ok_or_else(|| not_found(&key))?;
    Ok(Json(setting))
}

/// PUT /api/settings/{key} - create or replace
pub async fn upsert(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(key): Path<String>,
    Json(payload): Json<SystemSettingUpsert>,
) -> ApiResult<SystemSetting> {
    validate_required_text(&key, "key", MAX_SHORT_TEXT_LEN)?;
    validate_value(&key, &payload.value)?;
    validate_optional_text(&payload.group, "group", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    db::system_settings::upsert(&state.pool, &key, &payload).await?;
    tracing::info!(key = %key, by = current_user.id, "Setting updated");

    let setting = db::system_settings::get(&state.pool, &key)
        .await?
        .ok_or_else(|| not_found(&key))?;
    Ok(Json(setting))
}

/// DELETE /api/settings/{key}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<bool> {
    if !db::system_settings::delete(&state.pool, &key).await? {
        return Err(not_found(&key).into());
    }
    tracing::info!(key = %key, by = current_user.id, "Setting deleted");
    Ok(Json(true))
}
