use std::env;

/// 애플리케이션 설정
///
/// 시작 시 한 번 환경 변수에서 읽어 `AppState`로 전달합니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub logging: LoggingConfig,
    /// SMTP 설정이 없으면 알림은 로그로만 남습니다.
    pub mail: Option<MailConfig>,
    /// 설정이 없으면 rate limit을 적용하지 않습니다.
    pub rate_limit: Option<RateLimitConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// true면 시작 시 엔티티 정의로 테이블/인덱스를 생성합니다.
    pub schema_update: bool,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub default_filter: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// 초당 보충되는 요청 수
    pub per_second: u64,
    /// 순간 허용 요청 수
    pub burst_size: u32,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let schema_update = env::var("DB_SCHEMA_UPDATE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or_else(|_| {
                tracing::warn!(
                    "DB_SCHEMA_UPDATE 값이 올바르지 않아 false로 처리합니다. 'true' 또는 'false'를 사용하세요."
                );
                false
            });

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "secret".to_string()
        });

        let logging = LoggingConfig {
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            default_filter: env::var("LOG_DEFAULT_FILTER")
                .unwrap_or_else(|_| "info,campus_event_server=debug".to_string()),
        };

        let mail = match env::var("SMTP_HOST") {
            Ok(smtp_host) if !smtp_host.is_empty() => Some(MailConfig {
                smtp_host,
                smtp_port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidSmtpPort)?,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_address: env::var("MAIL_FROM")
                    .unwrap_or_else(|_| "admin@eventmanagement.com".to_string()),
            }),
            _ => None,
        };

        let rate_limit = match env::var("RATE_LIMIT_PER_SECOND") {
            Ok(value) => Some(RateLimitConfig {
                per_second: value.parse().map_err(|_| ConfigError::InvalidRateLimit)?,
                burst_size: env::var("RATE_LIMIT_BURST")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidRateLimit)?,
            }),
            Err(_) => None,
        };

        Ok(Self {
            server_port,
            database: DatabaseConfig {
                url: database_url,
                schema_update,
            },
            jwt_secret,
            logging,
            mail,
            rate_limit,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
    #[error("Invalid SMTP port number")]
    InvalidSmtpPort,
    #[error("Invalid rate limit configuration")]
    InvalidRateLimit,
}
