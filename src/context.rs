//! Application context shared by every operation.
//!
//! Holds the open database connection and the loaded settings. Passed
//! explicitly instead of living in a global.

use crate::{
    config::{
        database::{create_connection, create_tables},
        settings::Settings,
    },
    core::category::seed_default_categories,
    errors::Result,
    service::ProjectionService,
    store::SeaOrmStore,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info};

/// Database connection plus settings.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Open connection
    pub db: DatabaseConnection,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

impl AppContext {
    /// Wraps an existing connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: Settings) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
        }
    }

    /// Connects to the configured database, creates missing tables and seeds
    /// the default categories.
    pub async fn initialize(settings: Settings) -> Result<Self> {
        let db = create_connection(&settings.database.url)
            .await
            .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
        create_tables(&db)
            .await
            .inspect(|()| info!("Database tables ready"))?;
        seed_default_categories(&db, &settings.categories).await?;
        Ok(Self::new(db, settings))
    }

    /// A projection service reading from this context's database.
    #[must_use]
    pub fn projection_service(&self) -> ProjectionService {
        ProjectionService::new(
            Arc::new(SeaOrmStore::new(self.db.clone())),
            self.settings.projection_options(),
        )
    }
}
