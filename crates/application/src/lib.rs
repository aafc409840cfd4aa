use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;

/// Article Application - owns the database handle and the services built on it
pub struct ArticleApp {
    pub article_service: ArticleService,
    database: Database,
}

impl ArticleApp {
    /// Open the database at `database_url` and wire the services.
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::connect(database_url, pool_size)?;
        Ok(Self::with_database(database))
    }

    pub fn with_database(database: Database) -> Self {
        let pool = database.get_pool().clone();

        // Create repository implementations
        let article_repository: Arc<dyn ArticleRepository> =
            Arc::new(SqliteArticleRepository::new(pool));

        // Domain services
        let article_service = ArticleService::new(article_repository);

        Self {
            article_service,
            database,
        }
    }

    /// Idle connections currently held by the pool.
    pub fn idle_connections(&self) -> u32 {
        self.database.get_pool().state().idle_connections
    }

    /// Explicit teardown: closes the pool once in-flight requests let go of
    /// their connections.
    pub fn shutdown(self) {
        info!(
            idle_connections = self.idle_connections(),
            "closing database pool"
        );
        drop(self.database);
    }
}
