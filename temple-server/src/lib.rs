//! Temple administration and hall booking server
//!
//! REST backend over SQLite:
//!
//! ```text
//! temple-server/src/
//! ├── api/          # axum routers and handlers, one module per resource
//! ├── auth/         # JWT, password hashing, permission gates
//! ├── db/           # sqlx queries per table
//! ├── services/     # codes, pricing, payment-due and booking rules
//! ├── config.rs     # environment configuration
//! ├── error.rs      # ServiceError bridging sqlx and AppError
//! ├── logger.rs     # tracing setup and security_log!
//! ├── state.rs      # AppState
//! └── validation.rs # request field checks
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod validation;

pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use logger::init_logger;
pub use state::AppState;
