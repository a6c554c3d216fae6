use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use super::message::EmailMessage;
use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("smtp delivery failed: {0}")]
    Transport(String),
}

/// 메일 발송 추상화
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// 발송을 시도하고 실패는 로그만 남깁니다. 재시도하지 않습니다.
pub async fn deliver(notifier: &dyn Notifier, message: EmailMessage) {
    if let Err(e) = notifier.send(&message).await {
        warn!(
            to = %message.to,
            subject = %message.subject,
            error = %e,
            "notification delivery failed"
        );
    }
}

/// SMTP 릴레이를 통한 메일 발송
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotificationError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(message
                .to
                .parse()
                .map_err(|_| NotificationError::InvalidAddress(message.to.clone()))?)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| NotificationError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// SMTP 미설정 환경용. 메일 내용을 로그로만 남깁니다.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "mail transport not configured, notification logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingNotifier {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotificationError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotificationError::Transport("connection refused".into()))
        }
    }

    fn sample_message() -> EmailMessage {
        EmailMessage {
            to: "student@college.edu".to_string(),
            subject: "Event Cancelled: Rust Workshop".to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn deliver_should_swallow_failures_without_retry() {
        let notifier = FailingNotifier {
            attempts: AtomicUsize::new(0),
        };

        deliver(&notifier, sample_message()).await;

        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_notifier_should_always_succeed() {
        let result = LogNotifier.send(&sample_message()).await;
        assert!(result.is_ok());
    }
}
