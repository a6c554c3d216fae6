use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::audit::logger::AuditLogger;
use crate::domain::notification::Notifier;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub notifier: Arc<dyn Notifier>,
    pub audit: AuditLogger,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db,
            config,
            notifier,
            audit: AuditLogger::new(),
        }
    }
}
