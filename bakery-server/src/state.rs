//! Application state

use std::sync::Arc;

use crate::auth::JwtService;
use crate::config::Config;
use crate::db::{MemoryStore, PgStore, Store};
use crate::email::Mailer;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Persistence (PostgreSQL or in-memory)
    pub store: Arc<dyn Store>,
    /// Admin token signing/verification
    pub jwt: JwtService,
    /// Password notification emails
    pub mailer: Mailer,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState, connecting to the database when one is configured
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let store = PgStore::connect(url, config.database_max_connections).await?;
                tracing::info!("Database ready, migrations applied");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store (data is lost on exit)");
                Arc::new(MemoryStore::new())
            }
        };

        if config.email.is_none() {
            tracing::warn!("SendGrid not configured, new admin passwords go to the server log");
        }

        Ok(Self::with_store(config, store))
    }

    /// Build state around an existing store
    pub fn with_store(config: &Config, store: Arc<dyn Store>) -> Self {
        Self {
            store,
            jwt: JwtService::new(&config.jwt_secret),
            mailer: Mailer::new(config.email.clone()),
            config: Arc::new(config.clone()),
        }
    }
}
