//! What happens once the order has arrived.

use crate::{Error, Result};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Arrival notifications.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    command: Option<String>,
}

impl Notifier {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// Fire every configured notification.
    ///
    /// Failures are logged and never stop the notifier from exiting cleanly.
    pub async fn on_arrival(&self) {
        self.send_slack();

        let Some(ref command) = self.command else {
            return;
        };
        match run_shell(command).await {
            Ok(status) => info!("arrival command exited with {}", status),
            Err(e) => warn!("{}", e),
        }
    }

    /// Slack delivery placeholder.
    pub fn send_slack(&self) {
        debug!("slack notification not configured");
    }
}

/// Run a command line through the platform shell, inheriting stdio.
pub async fn run_shell(command: &str) -> Result<ExitStatus> {
    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };

    info!("running arrival command: {}", command);
    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .status()
        .await
        .map_err(|e| Error::Command(format!("'{}': {}", command, e)))?;

    if status.success() {
        Ok(status)
    } else {
        Err(Error::Command(format!(
            "'{}' exited with code {}",
            command,
            status.code().unwrap_or(-1)
        )))
    }
}
