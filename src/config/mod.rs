pub mod app_config;
pub mod database;

pub use app_config::{
    AppConfig, ConfigError, DatabaseConfig, LoggingConfig, MailConfig, RateLimitConfig,
};
pub use database::establish_connection;
