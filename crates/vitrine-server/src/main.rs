mod api;
mod middleware;
mod notify;
mod subscriptions;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vitrine_catalog::CatalogService;

use crate::{
    api::{build_app, AppState},
    notify::WebhookNotifier,
    subscriptions::SubscriptionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = CatalogService::from_config(&config);
    if !catalog.source_available() {
        tracing::warn!(
            path = %catalog.workbook_path.display(),
            "workbook not found; catalog requests will fail until it exists"
        );
    }

    let notifier = config
        .webhook_url
        .as_deref()
        .map(|url| WebhookNotifier::new(url, config.webhook_timeout_secs))
        .transpose()?;

    let state = AppState {
        catalog: Arc::new(catalog),
        subscriptions: SubscriptionStore::new(config.subscriptions_path.clone()),
        notifier,
    };
    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        market = %config.default_market,
        subscriptions = %state.subscriptions.path().display(),
        webhook = config.webhook_url.is_some(),
        "starting vitrine-server"
    );

    let app = build_app(state, &config.public_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
