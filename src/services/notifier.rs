//! Transient desktop notifications.

use notify_rust::{Notification, Timeout};
use tracing::{error, info, warn};

use crate::config::Config;

/// Notification severity, mapped to log level and summary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// Shows transient notifications for save outcomes.
///
/// Delivery failures are logged and swallowed; a broken notification daemon
/// must never fail a save.
pub struct Notifier {
    enabled: bool,
    timeout_ms: u32,
}

impl Notifier {
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.notifications.enabled,
            timeout_ms: config.notifications.timeout_ms,
        }
    }

    /// Show a transient notification with the given message.
    pub fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info => info!("{message}"),
            Level::Warning => warn!("{message}"),
            Level::Error => error!("{message}"),
        }

        if !self.enabled {
            return;
        }

        let summary = match level {
            Level::Info => "Clipvault",
            Level::Warning => "Clipvault warning",
            Level::Error => "Clipvault error",
        };

        let result = Notification::new()
            .summary(summary)
            .body(message)
            .timeout(Timeout::Milliseconds(self.timeout_ms))
            .show();

        if let Err(e) = result {
            warn!("failed to show notification: {e}");
        }
    }
}
