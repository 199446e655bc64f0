//! Quotation API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/quotations", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("quotations:view")));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/send", post(handler::send))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/convert", post(handler::convert))
        .layer(middleware::from_fn(require_permission("quotations:manage")));

    read_routes.merge(manage_routes)
}
