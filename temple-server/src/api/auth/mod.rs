//! Auth API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/login | POST | public |
//! | /api/auth/me | GET | token |
//! | /api/auth/logout | POST | token |
//! | /api/auth/change-password | POST | token |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
        .route("/change-password", post(handler::change_password))
}
