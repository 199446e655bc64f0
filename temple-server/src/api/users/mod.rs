//! User management API (super_admin and admin only)

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::Role;

use crate::auth::require_role;
use crate::state::AppState;

const USER_ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(USER_ADMINS)))
}
