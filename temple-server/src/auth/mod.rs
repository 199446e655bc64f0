//! Authentication and authorization
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - per-request user context
//! - [`require_auth`] - authentication middleware
//! - [`require_permission`] / [`require_role`] - authorization gates

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission, require_role};
pub use password::{hash_password, verify_password};
