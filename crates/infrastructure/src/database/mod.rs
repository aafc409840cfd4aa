use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use domain::DomainError;
use std::time::Duration;
use tracing::info;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applied to every pooled connection when it is opened.
#[derive(Debug)]
struct SqliteConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqliteConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Owns the connection pool. Built once at startup and handed to the
/// repositories; dropping it closes every connection.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool and make sure the schema exists.
    pub fn connect(database_url: &str, pool_size: u32) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = r2d2::Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(SqliteConnectionOptions {
                busy_timeout: BUSY_TIMEOUT,
            }))
            .build(manager)
            .map_err(|e| {
                DomainError::RepositoryError(format!(
                    "Failed to create SQLite connection pool for {}: {}",
                    database_url, e
                ))
            })?;

        let database = Database { pool };
        database.initialize()?;
        info!(database_url, pool_size, "database ready");
        Ok(database)
    }

    fn initialize(&self) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;
        conn.batch_execute(SCHEMA_SQL)
            .map_err(|e| DomainError::RepositoryError(format!("Failed to apply schema: {}", e)))
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
