use std::sync::Arc;

use crate::config::AppConfig;
use crate::library::sync::LibrarySync;
use crate::metrics::Metrics;
use crate::routes::admin::AdminAttempts;

/// The shared application state, cloneable for axum's request extraction.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: sqlx::SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Operational counters.
    pub metrics: Metrics,
    /// The library sync coordinator (one logical mirror per process).
    pub library: LibrarySync,
    /// Failed-attempt tracking for the admin export endpoints.
    pub admin_attempts: AdminAttempts,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> anyhow::Result<Self> {
        let metrics = Metrics::new();
        let library = LibrarySync::new(db.clone(), config.library.clone(), metrics.clone())?;
        Ok(Self {
            db,
            config: Arc::new(config),
            metrics,
            library,
            admin_attempts: AdminAttempts::new(),
        })
    }
}
