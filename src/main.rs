use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use sqlx::migrate::Migrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_core::clients::HttpCatalog;
use wallet_core::services::{
    ActivityLog, HttpActivityLog, TracingActivityLog, WalletService, WalletSettings,
};
use wallet_core::{AppState, config, create_app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::from_env()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database pool
    let pool = db::create_pool(&config).await?;

    // Run migrations
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(&pool).await?;
    tracing::info!("Database migrations completed");

    let catalog = Arc::new(HttpCatalog::new(config.catalog_base_url.clone()));
    tracing::info!("Catalog client initialized with URL: {}", config.catalog_base_url);

    let activity_log: Arc<dyn ActivityLog> = match &config.activity_log_url {
        Some(url) => {
            tracing::info!("Activity log sink: {}", url);
            Arc::new(HttpActivityLog::new(url.clone()))
        }
        None => {
            tracing::info!("No activity log URL configured, logging locally");
            Arc::new(TracingActivityLog)
        }
    };

    let wallet = WalletService::new(
        pool.clone(),
        WalletSettings::from_config(&config),
        catalog,
        activity_log,
    );

    let app_state = AppState {
        db: pool.clone(),
        wallet,
    };
    let app = create_app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
