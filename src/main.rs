mod auth;
mod db;
mod error;
mod feedback;
mod history;
mod location;
mod middleware;
mod missed;
mod notification;
mod reminder;
mod routes;
mod schedule;
mod scheduler;
mod state;
mod store;
mod tip;
mod user;

use std::sync::Arc;

use anyhow::Context;
use db::{create_pool, run_migrations};
use notification::{FcmSender, LogSender, NotificationSender, ServiceAccount};
use routes::create_router;
use scheduler::start_reminder_scheduler;
use state::{AppState, Config};
use store::{MemoryStore, PgDocumentStore, RecordStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gms_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let store = connect_store(&config).await?;
    let sender = build_sender(&config)?;

    let state = AppState::new(config.clone(), store, sender);

    // The returned handle keeps the cron timer alive for the life of the process.
    let reminder_scheduler = Arc::new(state.reminder_scheduler());
    let _jobs = start_reminder_scheduler(reminder_scheduler, &config.reminder_cron)
        .await
        .context("failed to start reminder scheduler")?;

    let app = create_router(state);

    let addr = config.listen_addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, records are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = create_pool(database_url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Running migrations...");
    run_migrations(&pool).await.context("failed to run migrations")?;

    Ok(Arc::new(PgDocumentStore::new(pool)))
}

fn build_sender(config: &Config) -> anyhow::Result<Arc<dyn NotificationSender>> {
    let Some(path) = config.firebase_credentials.as_deref() else {
        tracing::warn!("FIREBASE_CREDENTIALS not set, push notifications are only logged");
        return Ok(Arc::new(LogSender));
    };

    let account = ServiceAccount::from_file(path)?;
    let project_id = config
        .firebase_project_id
        .clone()
        .or_else(|| account.project_id.clone())
        .context("FIREBASE_PROJECT_ID not set and missing from the service account file")?;

    tracing::info!("Push notifications go through FCM project {}", project_id);
    Ok(Arc::new(FcmSender::new(project_id, account)?))
}
