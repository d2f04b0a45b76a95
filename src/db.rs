use crate::config::{DatabaseConfig, StorageBackend, StorageConfig};
use crate::database::EarningsStore;
use crate::database::in_memory::InMemoryRepository;
use crate::database::postgres_repository::PostgresRepository;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

async fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(30))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&db_config.url)
        .await
}

async fn init_postgres(db_config: &DatabaseConfig) -> Result<PostgresRepository, sqlx::Error> {
    let pool = init_pool(db_config).await?;

    if db_config.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(PostgresRepository { pool })
}

/// Manages an `Arc<dyn EarningsStore>` for the configured backend.
pub fn stage_store(storage: StorageConfig, db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Earnings store", move |rocket| async move {
        let store: Arc<dyn EarningsStore> = match storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(InMemoryRepository::new())
            }
            StorageBackend::Postgres => match init_postgres(&db_config).await {
                Ok(repo) => {
                    tracing::info!("Database pool initialized successfully");
                    Arc::new(repo)
                }
                Err(e) => {
                    tracing::error!("Failed to initialize database: {}", e);
                    return Err(rocket);
                }
            },
        };

        Ok(rocket.manage(store))
    })
}
