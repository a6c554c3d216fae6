pub mod message;
pub mod notifier;

pub use message::{cancellation_notice, rejection_notice, EmailMessage};
pub use notifier::{deliver, LogNotifier, NotificationError, Notifier, SmtpNotifier};
