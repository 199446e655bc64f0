//! HTTP API
//!
//! One module per resource, each exposing `router()` with its permission
//! gates. [`build_app`] adds the tower-http stack and authentication.
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - login, logout, current user, password change
//! - [`users`] - back-office accounts (admin roles only)
//! - [`customers`], [`devotees`] - people registries
//! - [`halls`], [`billing_items`], [`catering_vendors`], [`dinner_packages`] - catalog
//! - [`bookings`], [`quotations`], [`payments`] - hall booking workflow
//! - [`settings`], [`dashboard`] - administration

pub mod auth;
pub mod billing_items;
pub mod bookings;
pub mod catering_vendors;
pub mod customers;
pub mod dashboard;
pub mod devotees;
pub mod dinner_packages;
pub mod halls;
pub mod health;
pub mod middleware;
pub mod payments;
pub mod quotations;
pub mod settings;
pub mod users;

use axum::{Json, Router};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: JSON body or an error rendered through `AppError`
pub type ApiResult<T> = Result<Json<T>, ServiceError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(customers::router())
        .merge(devotees::router())
        .merge(halls::router())
        .merge(billing_items::router())
        .merge(catering_vendors::router())
        .merge(dinner_packages::router())
        .merge(bookings::router())
        .merge(quotations::router())
        .merge(payments::router())
        .merge(settings::router())
        .merge(dashboard::router())
}

/// Routes plus the middleware stack; used by the server and by tests
pub fn build_app(state: &AppState) -> Router<AppState> {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Outermost: resolves CurrentUser before the routes' permission gates
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
