//! Application state - shared across all handlers.

use std::sync::Arc;

use posts_core::PostService;
use posts_core::ports::PostRepository;
use posts_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use posts_infra::database::{DatabasePool, PostgresPostRepository};
#[cfg(not(feature = "postgres"))]
use posts_infra::database::InMemoryPostRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    #[cfg(feature = "postgres")]
    pool: Option<DatabasePool>,
}

impl AppState {
    /// Build the application state with the configured repository.
    #[cfg(feature = "postgres")]
    pub async fn new(db_config: Option<&DatabaseConfig>) -> anyhow::Result<Self> {
        let Some(config) = db_config else {
            anyhow::bail!("DATABASE_URL must be set");
        };

        let pool = DatabasePool::connect(config).await?;
        let repo = Arc::new(PostgresPostRepository::new(pool.clone()));

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: PostService::new(repo),
            pool: Some(pool),
        })
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn new(db_config: Option<&DatabaseConfig>) -> anyhow::Result<Self> {
        if db_config.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory repository");

        Ok(Self::with_repository(Arc::new(InMemoryPostRepository::new())))
    }

    /// State over an arbitrary repository, without a pool to close.
    #[cfg_attr(all(feature = "postgres", not(test)), allow(dead_code))]
    pub fn with_repository(repo: Arc<dyn PostRepository>) -> Self {
        Self {
            posts: PostService::new(repo),
            #[cfg(feature = "postgres")]
            pool: None,
        }
    }

    /// Release the database pool, if any.
    pub async fn shutdown(self) {
        #[cfg(feature = "postgres")]
        {
            if let Some(pool) = self.pool {
                if let Err(e) = pool.close().await {
                    tracing::error!("Failed to close database pool: {}", e);
                }
            }
        }
    }
}
