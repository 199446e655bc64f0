//! Authentication and authorization middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::db;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;

/// Routes reachable without a token
const PUBLIC_PATHS: &[&str] = &["/api/auth/login"];

/// Authentication middleware.
///
/// Validates `Authorization: Bearer <token>`, rejects revoked tokens, reloads
/// the user row and injects [`CurrentUser`] into the request extensions.
/// CORS preflight, non-API paths and public routes pass through untouched.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_PATHS.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %req.uri());
            return Err(AppError::not_authenticated());
        }
    };

    let claims = match state.jwt.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %req.uri());
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    if db::revoked_tokens::is_revoked(&state.pool, &claims.jti)
        .await
        .map_err(ServiceError::from)?
    {
        security_log!(WARN, "revoked_token_used", user_id = %claims.sub);
        return Err(AppError::invalid_token("Token has been revoked"));
    }

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed token subject"))?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::invalid_token("User no longer exists"))?;

    if !user.is_active {
        security_log!(WARN, "inactive_user_token", user_id = user.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    req.extensions_mut().insert(CurrentUser::new(&user, &claims));
    Ok(next.run(req).await)
}

/// Permission middleware: the current user's role must grant `permission`.
///
/// ```ignore
/// Router::new()
///     .route("/", get(handler::list))
///     .layer(middleware::from_fn(require_permission("bookings:view")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_permission(permission) {
                security_log!(
                    WARN,
                    "permission_denied",
                    user_id = user.id,
                    role = %user.role,
                    required_permission = permission
                );
                return Err(AppError::permission_denied(format!(
                    "Permission denied: {permission}"
                ))
                .with_detail("required_permission", permission));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Role middleware: the current user's role must be in `roles`.
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_any_role(roles) {
                security_log!(
                    WARN,
                    "role_required",
                    user_id = user.id,
                    role = %user.role
                );
                return Err(AppError::new(ErrorCode::RoleRequired));
            }

            Ok(next.run(req).await)
        })
    }
}
