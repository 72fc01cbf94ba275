//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Token lifetime handed to the admin UI (1 hour)
pub const ADMIN_TOKEN_TTL_MS: i64 = 3_600_000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// PostgreSQL connection URL; `None` runs on the in-memory store
    pub database_url: Option<String>,
    /// Pool size
    pub database_max_connections: u32,
    /// HTTP port
    pub http_port: u16,
    /// Secret for signing admin tokens
    pub jwt_secret: String,
    /// Admin password hash used until one is stored in `admin_settings`
    pub admin_password_hash: Option<String>,
    /// bcrypt work factor for new admin password hashes
    pub bcrypt_cost: u32,
    /// SendGrid settings; `None` puts password emails in dev mode (log only)
    pub email: Option<EmailConfig>,
    /// Archived orders older than this stay out of a customer's listing
    pub archive_retention_months: u32,
    /// Business days an order stays `archived` before it is hidden
    pub archive_hide_business_days: u32,
    /// Interval of the background archive sweep
    pub archive_sweep_interval_secs: u64,
}

/// SendGrid transport settings
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub from: String,
    /// `EMAIL_ADMIN` and `EMAIL_DEV`, empty values dropped
    pub recipients: Vec<String>,
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

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = Self::optional("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let email = match (Self::optional("SENDGRID_API_KEY"), Self::optional("EMAIL_FROM")) {
            (Some(api_key), Some(from)) => Some(EmailConfig {
                api_key,
                from,
                recipients: ["EMAIL_ADMIN", "EMAIL_DEV"]
                    .iter()
                    .filter_map(|name| Self::optional(name))
                    .collect(),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            database_max_connections: Self::parsed("DATABASE_MAX_CONNECTIONS", 5),
            http_port: Self::parsed("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            admin_password_hash: Self::optional("ADMIN_PASSWORD_HASH"),
            bcrypt_cost: Self::parsed("BCRYPT_COST", 12),
            email,
            archive_retention_months: Self::parsed("ARCHIVE_RETENTION_MONTHS", 1),
            archive_hide_business_days: Self::parsed("ARCHIVE_HIDE_BUSINESS_DAYS", 3),
            archive_sweep_interval_secs: Self::parsed("ARCHIVE_SWEEP_INTERVAL_SECS", 3600),
            environment,
        })
    }

    /// Development defaults without a database or email transport
    pub fn development() -> Self {
        Self {
            environment: "development".into(),
            database_url: None,
            database_max_connections: 5,
            http_port: 8080,
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            admin_password_hash: None,
            bcrypt_cost: 12,
            email: None,
            archive_retention_months: 1,
            archive_hide_business_days: 3,
            archive_sweep_interval_secs: 3600,
        }
    }
}
