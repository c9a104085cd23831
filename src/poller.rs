//! The status polling loop.

use crate::lunch::{Clock, LunchWindow};
use crate::site::OrderSite;
use crate::status::OrderStatus;
use crate::Result;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The status label reported arrival.
    Arrived,
    /// The cancellation token fired before a check.
    Cancelled,
    /// Single-check mode and the order has not arrived yet.
    NotArrived,
}

/// What an interrupt should do, given how far shutdown has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// First interrupt: the loop stops before its next check.
    Graceful,
    /// Shutdown was already requested: exit without waiting.
    Force,
}

/// Record an interrupt on the cancellation token.
///
/// The first call cancels the token. Later calls report [`Interrupt::Force`].
pub fn interrupt(cancel: &CancellationToken) -> Interrupt {
    if cancel.is_cancelled() {
        Interrupt::Force
    } else {
        cancel.cancel();
        Interrupt::Graceful
    }
}

/// Loop parameters.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub once: bool,
    pub lunch_window: LunchWindow,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            once: false,
            lunch_window: LunchWindow::default(),
        }
    }
}

/// Polls an [`OrderSite`] until the order arrives.
///
/// Status lines go to `out`; diagnostics go through `tracing`.
pub struct Poller<S, C, W> {
    site: S,
    clock: C,
    out: W,
    settings: PollSettings,
    cancel: CancellationToken,
    checks: u64,
}

impl<S, C, W> Poller<S, C, W>
where
    S: OrderSite,
    C: Clock,
    W: Write,
{
    pub fn new(site: S, clock: C, out: W, settings: PollSettings, cancel: CancellationToken) -> Self {
        Self {
            site,
            clock,
            out,
            settings,
            cancel,
            checks: 0,
        }
    }

    /// Number of status checks attempted so far.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    /// Run until arrival, cancellation, or the single check in `once` mode.
    ///
    /// Recoverable status failures are logged and retried on the next cycle.
    /// Fatal errors from the site, and failures writing to `out`, end the loop.
    pub async fn run(&mut self) -> Result<Outcome> {
        info!(
            "Starting status poller (interval: {:?}, once: {})",
            self.settings.interval, self.settings.once
        );

        loop {
            if self.cancel.is_cancelled() {
                writeln!(self.out, "Context cancelled, exiting.")?;
                return Ok(Outcome::Cancelled);
            }

            let lunch_time = self.settings.lunch_window.classify(self.clock.now());
            debug!("lunch time: {}", lunch_time);
            if let Some(advisory) = lunch_time.advisory() {
                writeln!(self.out, "{}", advisory)?;
            }

            self.checks += 1;
            match self.site.read_status().await {
                Ok(text) => {
                    writeln!(self.out, "CURRENT RELISH STATUS REPORTS AS: '{}'", text)?;
                    let status = OrderStatus::parse(&text);
                    debug!("notifier reports status: '{}'", status);
                    if status.is_arrived() {
                        writeln!(self.out, "Order has arrived!")?;
                        return Ok(Outcome::Arrived);
                    }
                    if status == OrderStatus::Unknown {
                        warn!("unknown order status: {}", text);
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Error checking status: {}", e);
                }
            }

            if self.settings.once {
                return Ok(Outcome::NotArrived);
            }

            writeln!(
                self.out,
                "Checking again in {} seconds...",
                self.settings.interval.as_secs()
            )?;
            self.out.flush()?;

            if let Err(e) = self.site.reload().await {
                warn!("Failed to reload page: {}", e);
            }
            tokio::time::sleep(self.settings.interval).await;
        }
    }

    /// Give back the site so the caller can close it.
    pub fn into_site(self) -> S {
        self.site
    }

    /// Give back the site and the output sink.
    pub fn into_parts(self) -> (S, W) {
        (self.site, self.out)
    }
}
