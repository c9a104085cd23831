mod relish;

pub use relish::RelishSite;

use crate::config::Credentials;
use crate::Result;
use async_trait::async_trait;

/// What the poller needs from the ordering site.
///
/// Everything coupled to the remote page markup lives behind this trait, so
/// the polling loop can run against a fake in tests.
#[async_trait]
pub trait OrderSite: Send {
    /// Walk the login form and land on the schedule page.
    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Read the raw text of the order status label.
    async fn read_status(&mut self) -> Result<String>;

    /// Reload the current page.
    async fn reload(&mut self) -> Result<()>;

    /// Release the browser session.
    async fn close(self) -> Result<()>;
}
