//! User-facing notification channel, the CLI's stand-in for the
//! dashboard's toast popups.
use tracing::{error, info};

/// Success/error notifications with a short title and a human-readable
/// message. Raw error payloads stay out of the message text.
pub trait Notifier: Send + Sync {
    fn success(&self, title: &str, message: &str);
    fn error(&self, title: &str, message: &str);
}

/// Notifier that writes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, title: &str, message: &str) {
        info!("{}: {}", title, message);
    }

    fn error(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
    }
}
