//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded from environment variables (`.env` honoured)
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    pub database_max_connections: u32,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub jwt_expiry_hours: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Seed super admin, created when the users table is empty
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://temple.db?mode=rwc".into()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(24),
            jwt_issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "temple-server".into()),
            jwt_audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "temple-admin".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@temple.local".into()),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            admin_name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Super Admin".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }

    /// Configuration for tests: in-memory database, fixed secrets
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            database_max_connections: 1,
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-secret-key-at-least-32-characters".into(),
            jwt_expiry_hours: 1,
            jwt_issuer: "temple-server".into(),
            jwt_audience: "temple-admin".into(),
            admin_email: "admin@temple.local".into(),
            admin_password: "admin-password".into(),
            admin_name: "Super Admin".into(),
            log_dir: None,
        }
    }
}
