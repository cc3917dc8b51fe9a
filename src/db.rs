use crate::config::Config;
use anyhow::Result;
use deadpool::Runtime;
use diesel::{Connection, PgConnection};
use diesel_async::{
    pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbConnection = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbPoolError =
    deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database manager for the API server
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database manager with connection pool
    pub async fn new() -> Result<Self> {
        let config = Config::get();
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database.url);

        // Configure pool with connection parameters
        let pool = DbPool::builder(manager)
            .max_size(config.database.max_connections as usize)
            .runtime(Runtime::Tokio1)
            .build()?;

        let db = Self { pool };

        // Test connection and run migrations
        db.initialize().await?;

        Ok(db)
    }

    /// Initialize the database by testing connection and running migrations
    async fn initialize(&self) -> Result<()> {
        let _conn = self.get_connection().await?;
        info!("Successfully connected to the database");

        self.run_migrations()?;

        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let config = Config::get();
        let mut conn = PgConnection::establish(&config.database.url)?;

        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("failed to run migrations: {e}"))?;
        info!("Database migrations applied successfully");

        Ok(())
    }

    /// Get a database connection from the pool
    pub async fn get_connection(&self) -> Result<DbConnection, DbPoolError> {
        self.pool.get().await
    }

    /// Get the database connection pool reference
    pub fn get_pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Initialize database connection pool and run migrations
pub async fn init_database() -> Result<Database> {
    Database::new().await
}
