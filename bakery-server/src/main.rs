//! bakery-server - storefront HTTP backend
//!
//! - Serves the customer and admin API
//! - Hides old archived orders on a fixed interval

use std::time::Duration;

use bakery_server::services::orders::{self, ArchivePolicy};
use bakery_server::{AppState, Config, build_app};
use shared::util::now_millis;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::from_env()?;
    tracing::info!("Starting bakery-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    // Archive sweep; listings also run it on demand
    let sweep_state = state.clone();
    let policy = ArchivePolicy::from(&config);
    let period = Duration::from_secs(config.archive_sweep_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) =
                orders::hide_old_archived(sweep_state.store.as_ref(), policy, now_millis()).await
            {
                tracing::error!("Archive sweep failed: {e:?}");
            }
        }
    });

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bakery-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bakery-server stopped");
    Ok(())
}

/// `RUST_LOG` filter; `LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bakery_server=info,tower_http=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
