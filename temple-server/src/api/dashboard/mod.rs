//! Dashboard API

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/dashboard", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::summary))
        .layer(middleware::from_fn(require_permission("dashboard:view")))
}
