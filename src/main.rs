use std::net::SocketAddr;
use std::sync::Arc;

use campus_event_server::config::{establish_connection, AppConfig};
use campus_event_server::domain::health;
use campus_event_server::domain::notification::{LogNotifier, Notifier, SmtpNotifier};
use campus_event_server::global::shutdown::shutdown_signal;
use campus_event_server::utils::logging::init_logging;
use campus_event_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 3. 로깅 초기화 (guard는 종료까지 유지)
    let _log_guard = init_logging(&config.logging);
    health::init_start_time();

    // 4. DB 연결
    let db = establish_connection(&config.database).await?;

    // 5. 알림 발송기: SMTP 설정이 없으면 로그로 대체
    let notifier: Arc<dyn Notifier> = match config.mail.as_ref() {
        Some(mail) => Arc::new(SmtpNotifier::new(mail)?),
        None => {
            tracing::warn!("SMTP_HOST가 설정되지 않아 알림 메일을 로그로만 남깁니다.");
            Arc::new(LogNotifier)
        }
    };

    // 6. 라우터 설정
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = app(AppState::new(db, config, notifier));

    // 7. 서버 실행
    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
