use std::time::Duration;

use temple_server::{AppState, Config, api, db, init_logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Revoked token cleanup interval
const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = init_logger(config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting temple-server"
    );

    let state = AppState::new(&config).await?;

    // Periodic revoked-token cleanup
    let pool = state.pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let now = chrono::Utc::now().timestamp();
            match db::revoked_tokens::purge_expired(&pool, now).await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(purged = n, "Purged expired revoked tokens"),
                Err(e) => tracing::warn!(error = %e, "Revoked token cleanup failed"),
            }
        }
    });

    let app = api::build_app(&state).with_state(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("temple-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("temple-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
