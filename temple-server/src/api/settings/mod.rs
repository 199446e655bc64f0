//! System Settings API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_permission;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/settings", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{key}", get(handler::get_by_key))
        .layer(middleware::from_fn(require_permission("settings:view")));

    let manage_routes = Router::new()
        .route("/{key}", put(handler::upsert).delete(handler::delete))
        .layer(middleware::from_fn(require_permission("settings:manage")));

    read_routes.merge(manage_routes)
}
