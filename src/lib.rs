//! # relish-notifier
//!
//! Log in to Relish with a headless browser, poll the order status label on
//! an interval, and stop once the order has arrived.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relish_notifier::{Credentials, LocalClock, Poller, RelishSite, Settings};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> relish_notifier::Result<()> {
//! let credentials = Credentials::from_env()?;
//! let settings = Settings::default();
//! let mut site = RelishSite::launch(&settings).await?;
//! relish_notifier::OrderSite::login(&mut site, &credentials).await?;
//!
//! let mut poller = Poller::new(
//!     site,
//!     LocalClock,
//!     std::io::stdout(),
//!     settings.poll_settings(),
//!     CancellationToken::new(),
//! );
//! let outcome = poller.run().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

mod config;
mod lunch;
mod notify;
mod poller;
mod site;
mod status;

pub use config::{BrowserSettings, Credentials, Selectors, Settings};
pub use lunch::{Clock, LocalClock, LunchTime, LunchWindow};
pub use notify::Notifier;
pub use poller::{interrupt, Interrupt, Outcome, PollSettings, Poller};
pub use site::{OrderSite, RelishSite};
pub use status::OrderStatus;

/// Result type for relish-notifier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, logging in, or polling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("Please set RELISH_EMAIL and RELISH_PASSWORD environment variables (missing: {0})")]
    MissingCredentials(String),

    #[error("login failed at {step}: {source}")]
    Login {
        step: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("status label: {0}")]
    StatusLabel(String),

    #[error("arrival command failed: {0}")]
    Command(String),
}

impl Error {
    /// Whether this error should end the process.
    ///
    /// Only status-label lookups are retried on the next poll; everything
    /// else is reported to the driver and turned into a non-zero exit.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::StatusLabel(_))
    }

    pub(crate) fn login(step: &'static str, source: impl Into<Error>) -> Self {
        Self::Login {
            step,
            source: Box::new(source.into()),
        }
    }
}
