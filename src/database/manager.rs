use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseBackend, DatabaseConfig};
use crate::database::error::StoreError;
use crate::database::memory::{MemoryFavsStore, MemoryUserStore};
use crate::database::mongo::{MongoFavsStore, MongoUserStore};
use crate::database::repository::{FavsStore, UserStore};

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Failed to create indexes: {0}")]
    IndexError(#[from] StoreError),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Owns the store handles for the configured backend
pub struct DatabaseManager {
    favs: Arc<dyn FavsStore>,
    users: Arc<dyn UserStore>,
    /// Set only for the MongoDB backend
    database: Option<Database>,
}

impl DatabaseManager {
    /// Connect to the configured backend and prepare its indexes
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory database backend");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Mongo => Self::connect_mongo(config).await,
        }
    }

    /// Fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self {
            favs: Arc::new(MemoryFavsStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            database: None,
        }
    }

    async fn connect_mongo(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }
        if config.name.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_NAME"));
        }

        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout));

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);

        let favs = MongoFavsStore::new(&database);
        let users = MongoUserStore::new(&database);
        favs.ensure_indexes().await?;
        users.ensure_indexes().await?;

        info!("Connected to MongoDB database: {}", config.name);
        Ok(Self {
            favs: Arc::new(favs),
            users: Arc::new(users),
            database: Some(database),
        })
    }

    pub fn favs(&self) -> Arc<dyn FavsStore> {
        Arc::clone(&self.favs)
    }

    pub fn users(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.users)
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self.database {
            Some(_) => DatabaseBackend::Mongo,
            None => DatabaseBackend::Memory,
        }
    }

    /// Pings the server; the in-memory backend is always healthy
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        if let Some(database) = &self.database {
            database.run_command(doc! { "ping": 1 }, None).await?;
        }
        Ok(())
    }
}
