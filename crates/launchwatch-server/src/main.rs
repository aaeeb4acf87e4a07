mod api;
mod middleware;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::store::InMemorySearchStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(launchwatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = Arc::new(launchwatch_core::load_settings(&config.categories_path)?);
    tracing::info!(
        categories = settings.categories.len(),
        path = %config.categories_path.display(),
        "loaded extractor settings"
    );

    let client = Arc::new(launchwatch_client::BrowserTaskClient::new(
        &config.api_base_url,
        &config.api_key,
        config.client_request_timeout_secs,
        config.client_max_retries,
        config.client_retry_backoff_base_secs,
    )?);

    let app = build_app(AppState {
        client,
        store: Arc::new(InMemorySearchStore::new()),
        settings,
        config: Arc::clone(&config),
    });

    tracing::info!(bind_addr = %config.bind_addr, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
