//! JWT token service
//!
//! Issues and validates HS256 access tokens. Every token carries a random
//! `jti` so it can be revoked on logout.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Role, User};
use thiserror::Error;

use super::permissions;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes outside development)
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn from_config(config: &crate::Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_hours: config.jwt_expiry_hours,
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Token ID, used for revocation
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a new access token for the user. Returns the token and its claims.
    pub fn generate_token(&self, user: &User) -> Result<(String, Claims), JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok((token, claims))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

/// Authenticated user for the current request.
///
/// Built by the auth middleware from the token claims and the stored user row,
/// so role changes and deactivation apply to already-issued tokens.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Token ID and expiry, kept for logout
    pub jti: String,
    pub exp: i64,
}

impl CurrentUser {
    pub fn new(user: &User, claims: &Claims) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            jti: claims.jti.clone(),
            exp: claims.exp,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Check a `resource:action` permission against the role's grants.
    ///
    /// `*` grants everything, `resource:*` grants every action on a resource.
    pub fn has_permission(&self, permission: &str) -> bool {
        permissions::role_has_permission(self.role, permission)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
            issuer: "temple-server".into(),
            audience: "temple-admin".into(),
        })
    }

    fn user(role: Role) -> User {
        User {
            id: 42,
            name: "Mei Ling".into(),
            email: "mei@temple.local".into(),
            password_hash: String::new(),
            role,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service("test-secret-key-at-least-32-characters");
        let (token, issued) = service
            .generate_token(&user(Role::Manager))
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "mei@temple.local");
        assert_eq!(claims.role, "manager");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let service = service("test-secret-key-at-least-32-characters");
        let (_, a) = service.generate_token(&user(Role::Staff)).unwrap();
        let (_, b) = service.generate_token(&user(Role::Staff)).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = service("test-secret-key-at-least-32-characters");
        let other = service("another-secret-key-at-least-32-chars!");
        let (token, _) = issuer.generate_token(&user(Role::Admin)).unwrap();
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let issuer = service("test-secret-key-at-least-32-characters");
        let mut config = issuer.config.clone();
        config.audience = "someone-else".into();
        let other = JwtService::with_config(config);
        let (token, _) = issuer.generate_token(&user(Role::Admin)).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }

    #[test]
    fn test_current_user_permissions() {
        let claims = Claims {
            sub: "42".into(),
            email: "mei@temple.local".into(),
            name: "Mei Ling".into(),
            role: "staff".into(),
            jti: "j".into(),
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        };
        let staff = CurrentUser::new(&user(Role::Staff), &claims);
        assert!(staff.has_permission("customers:manage"));
        assert!(!staff.has_permission("bookings:manage"));

        let root = CurrentUser::new(&user(Role::SuperAdmin), &claims);
        assert!(root.has_permission("anything:at_all"));
        assert!(root.is_super_admin());
    }
}
