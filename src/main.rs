use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lecture_scheduler::api::router;
use lecture_scheduler::config::SchedulerConfig;
use lecture_scheduler::models::Slot;
use lecture_scheduler::services::{ScheduleService, StoredCatalog, StoredEnrollments};
use lecture_scheduler::state::AppState;
use lecture_scheduler::store::{CollectionStore, SqliteBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "lecture_scheduler=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SchedulerConfig::new_from_env()?;

    let backend = SqliteBackend::connect(&config.database_url).await?;
    let store = CollectionStore::new(Arc::new(backend));

    let catalog = Arc::new(StoredCatalog::new(store.open("course_specs").await?));
    let enrollments = Arc::new(StoredEnrollments::new(store.open("enrollments").await?));

    let service = ScheduleService::open(&store, catalog, enrollments, &config).await?;
    let added = service.register_slots(Slot::default_day()).await?;
    if added > 0 {
        info!("registered {} default slots", added);
    }

    let state = AppState { service: Arc::new(service) };
    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
