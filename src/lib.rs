pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use services::dashboard::AdminDashboard;
use services::snapshot::LatestWins;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    /// Last successfully computed admin dashboard; newest refresh wins.
    pub admin_snapshot: Arc<LatestWins<AdminDashboard>>,
}

impl AppState {
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        Self {
            db,
            config,
            admin_snapshot: Arc::new(LatestWins::new()),
        }
    }
}
