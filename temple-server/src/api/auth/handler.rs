//! Auth API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, UserResponse,
};

use crate::api::ApiResult;
use crate::auth::permissions::effective_permissions;
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::db;
use crate::security_log;
use crate::state::AppState;
use crate::validation::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_password, validate_required_text,
};

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = req.email.trim();
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let user = match db::users::find_by_email(&state.pool, email).await? {
        Some(user) => user,
        None => {
            security_log!(WARN, "login_failed", email = %email, reason = "unknown_email");
            return Err(AppError::invalid_credentials().into());
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        security_log!(WARN, "login_failed", email = %email, reason = "bad_password");
        return Err(AppError::invalid_credentials().into());
    }

    if !user.is_active {
        security_log!(WARN, "login_disabled_account", user_id = user.id);
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let (token, _claims) = state.jwt.generate_token(&user).map_err(|e| {
        tracing::error!(error = %e, "Token generation failed");
        AppError::internal("Failed to issue token")
    })?;

    security_log!(INFO, "login_success", user_id = user.id, role = %user.role);

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.expires_in(),
        user: UserResponse::from(user),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<MeResponse> {
    let user = db::users::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(MeResponse {
        permissions: effective_permissions(user.role),
        user: UserResponse::from(user),
    }))
}

/// POST /api/auth/logout - revoke the presented token
pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<bool> {
    db::revoked_tokens::revoke(&state.pool, &current_user.jti, current_user.exp).await?;
    security_log!(INFO, "logout", user_id = current_user.id);
    Ok(Json(true))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<bool> {
    validate_password(&req.new_password)?;

    let user = db::users::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !verify_password(&req.current_password, &user.password_hash) {
        security_log!(WARN, "password_change_failed", user_id = user.id);
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Current password is incorrect",
        )
        .into());
    }

    let password_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    db::users::update_password(&state.pool, user.id, &password_hash).await?;

    security_log!(INFO, "password_changed", user_id = user.id);
    Ok(Json(true))
}
