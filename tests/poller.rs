//! Polling loop tests against a scripted site.
//!
//! Time is paused, so the 30 second sleeps between checks resolve instantly.

use async_trait::async_trait;
use chrono::NaiveTime;
use relish_notifier::{
    interrupt, Clock, Credentials, Error, Interrupt, OrderSite, Outcome, PollSettings, Poller,
    Result,
};
use std::collections::VecDeque;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const EARLY: &str = "Checking Relish, but it's a little early for lunch... someone is hungry!";
const LATE: &str = "Checking Relish, but it's a little late for lunch... might wanna talk to Shawn!";

struct FixedClock(NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

fn at(h: u32, m: u32) -> FixedClock {
    FixedClock(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

/// Replays a fixed sequence of status reads.
#[derive(Default)]
struct ScriptedSite {
    responses: VecDeque<Result<String>>,
    reads: usize,
    reloads: usize,
    /// Cancel this token when the read with this index (1-based) happens.
    cancel_on_read: Option<(usize, CancellationToken)>,
}

impl ScriptedSite {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: responses.into(),
            ..Default::default()
        }
    }

    fn statuses(statuses: &[&str]) -> Self {
        Self::new(statuses.iter().map(|s| Ok(s.to_string())).collect())
    }
}

#[async_trait]
impl OrderSite for ScriptedSite {
    async fn login(&mut self, _credentials: &Credentials) -> Result<()> {
        Ok(())
    }

    async fn read_status(&mut self) -> Result<String> {
        self.reads += 1;
        if let Some((n, ref token)) = self.cancel_on_read {
            if n == self.reads {
                token.cancel();
            }
        }
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok("Preparing Your Order".into()))
    }

    async fn reload(&mut self) -> Result<()> {
        self.reloads += 1;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}

fn settings() -> PollSettings {
    PollSettings::default()
}

fn run_output(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_early_lunch_until_arrival() {
    let site = ScriptedSite::statuses(&[
        "Order Placed",
        "Preparing Your Order",
        "Order Arrived at 12:15pm",
    ]);
    let start = tokio::time::Instant::now();
    let mut poller = Poller::new(
        site,
        at(11, 0),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    let outcome = poller.run().await.unwrap();
    assert_eq!(outcome, Outcome::Arrived);
    assert_eq!(poller.checks(), 3);

    let (site, out) = poller.into_parts();
    let out = run_output(out);

    assert_eq!(site.reads, 3);
    assert_eq!(site.reloads, 2);
    assert!(start.elapsed() >= Duration::from_secs(60));

    assert_eq!(out.matches(EARLY).count(), 3);
    assert!(!out.contains(LATE));
    assert!(out.contains("CURRENT RELISH STATUS REPORTS AS: 'Order Placed'"));
    assert!(out.contains("CURRENT RELISH STATUS REPORTS AS: 'Preparing Your Order'"));
    assert!(out.contains("CURRENT RELISH STATUS REPORTS AS: 'Order Arrived at 12:15pm'"));
    assert_eq!(out.matches("Checking again in 30 seconds...").count(), 2);
    assert!(out.trim_end().ends_with("Order has arrived!"));
}

#[tokio::test(start_paused = true)]
async fn test_on_time_prints_no_advisory() {
    let site = ScriptedSite::statuses(&["Order Arrived"]);
    let mut poller = Poller::new(
        site,
        at(11, 30),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    assert_eq!(poller.run().await.unwrap(), Outcome::Arrived);
    let (_, out) = poller.into_parts();
    let out = run_output(out);
    assert!(!out.contains(EARLY));
    assert!(!out.contains(LATE));
    assert!(out.contains("Order has arrived!"));
}

#[tokio::test(start_paused = true)]
async fn test_late_lunch_advisory() {
    let site = ScriptedSite::statuses(&["Order Arrived"]);
    let mut poller = Poller::new(
        site,
        at(12, 0),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    poller.run().await.unwrap();
    let (_, out) = poller.into_parts();
    assert!(run_output(out).starts_with(LATE));
}

#[tokio::test(start_paused = true)]
async fn test_status_error_does_not_stop_loop() {
    let site = ScriptedSite::new(vec![
        Err(Error::StatusLabel("'.schedule-card-label' not found".into())),
        Err(Error::StatusLabel("failed to read".into())),
        Ok("Order Arrived".into()),
    ]);
    let mut poller = Poller::new(
        site,
        at(11, 45),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    assert_eq!(poller.run().await.unwrap(), Outcome::Arrived);
    let (site, out) = poller.into_parts();
    let out = run_output(out);

    assert_eq!(site.reads, 3);
    assert_eq!(site.reloads, 2);
    // failed reads never print a status line
    assert_eq!(out.matches("CURRENT RELISH STATUS REPORTS AS").count(), 1);
    assert_eq!(out.matches("Checking again in").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_cycle_finishes_cycle() {
    let token = CancellationToken::new();
    let mut site = ScriptedSite::statuses(&["Order Placed", "Preparing Your Order"]);
    site.cancel_on_read = Some((2, token.clone()));

    let mut poller = Poller::new(site, at(11, 45), Vec::new(), settings(), token);

    assert_eq!(poller.run().await.unwrap(), Outcome::Cancelled);
    let (site, out) = poller.into_parts();
    let out = run_output(out);

    assert_eq!(site.reads, 2);
    // the cycle that observed cancellation still reloads and sleeps
    assert_eq!(site.reloads, 2);
    assert!(out.trim_end().ends_with("Context cancelled, exiting."));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_first_check() {
    let token = CancellationToken::new();
    token.cancel();
    let site = ScriptedSite::statuses(&["Order Arrived"]);
    let mut poller = Poller::new(site, at(11, 0), Vec::new(), settings(), token);

    assert_eq!(poller.run().await.unwrap(), Outcome::Cancelled);
    assert_eq!(poller.checks(), 0);

    let (site, out) = poller.into_parts();
    assert_eq!(site.reads, 0);
    assert_eq!(site.reloads, 0);
    assert_eq!(run_output(out), "Context cancelled, exiting.\n");
}

#[tokio::test(start_paused = true)]
async fn test_once_stops_after_single_check() {
    let site = ScriptedSite::statuses(&["Order Placed", "Order Arrived"]);
    let settings = PollSettings {
        once: true,
        ..PollSettings::default()
    };
    let mut poller = Poller::new(site, at(11, 45), Vec::new(), settings, CancellationToken::new());

    assert_eq!(poller.run().await.unwrap(), Outcome::NotArrived);
    let (site, out) = poller.into_parts();
    assert_eq!(site.reads, 1);
    assert_eq!(site.reloads, 0);
    assert!(!run_output(out).contains("Checking again"));
}

#[tokio::test(start_paused = true)]
async fn test_once_still_reports_arrival() {
    let site = ScriptedSite::statuses(&["Order Arrived"]);
    let settings = PollSettings {
        once: true,
        ..PollSettings::default()
    };
    let mut poller = Poller::new(site, at(11, 45), Vec::new(), settings, CancellationToken::new());

    assert_eq!(poller.run().await.unwrap(), Outcome::Arrived);
}

#[tokio::test(start_paused = true)]
async fn test_custom_interval_in_countdown() {
    let token = CancellationToken::new();
    let mut site = ScriptedSite::statuses(&["Order Placed"]);
    site.cancel_on_read = Some((1, token.clone()));
    let settings = PollSettings {
        interval: Duration::from_secs(5),
        ..PollSettings::default()
    };
    let mut poller = Poller::new(site, at(11, 45), Vec::new(), settings, token);

    poller.run().await.unwrap();
    let (_, out) = poller.into_parts();
    assert!(run_output(out).contains("Checking again in 5 seconds..."));
}

#[tokio::test(start_paused = true)]
async fn test_fatal_status_error_ends_loop() {
    let site = ScriptedSite::new(vec![
        Err(Error::StatusLabel("'.schedule-card-label' not found".into())),
        Err(Error::Config("browser went away".into())),
        Ok("Order Arrived".into()),
    ]);
    let mut poller = Poller::new(
        site,
        at(11, 45),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    let err = poller.run().await.unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{}", err);
    assert_eq!(poller.checks(), 2);

    let (site, out) = poller.into_parts();
    assert_eq!(site.reads, 2);
    assert_eq!(site.reloads, 1);
    assert!(!run_output(out).contains("Order has arrived!"));
}

#[tokio::test(start_paused = true)]
async fn test_status_text_printed_verbatim() {
    let site = ScriptedSite::statuses(&["  Order Placed\n", " Order Arrived "]);
    let mut poller = Poller::new(
        site,
        at(11, 45),
        Vec::new(),
        settings(),
        CancellationToken::new(),
    );

    assert_eq!(poller.run().await.unwrap(), Outcome::Arrived);
    let (_, out) = poller.into_parts();
    let out = run_output(out);
    assert!(out.contains("CURRENT RELISH STATUS REPORTS AS: '  Order Placed\n'"));
    assert!(out.contains("CURRENT RELISH STATUS REPORTS AS: ' Order Arrived '"));
}

#[test]
fn test_first_interrupt_cancels_second_forces_exit() {
    let token = CancellationToken::new();
    assert_eq!(interrupt(&token), Interrupt::Graceful);
    assert!(token.is_cancelled());
    assert_eq!(interrupt(&token), Interrupt::Force);
    assert_eq!(interrupt(&token), Interrupt::Force);
}

#[test]
fn test_interrupt_after_other_cancel_forces_exit() {
    let token = CancellationToken::new();
    token.clone().cancel();
    assert_eq!(interrupt(&token), Interrupt::Force);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_wait_stops_at_next_check() {
    let token = CancellationToken::new();
    let site = ScriptedSite::statuses(&["Order Placed", "Order Arrived"]);
    let settings = PollSettings {
        interval: Duration::from_secs(600),
        ..PollSettings::default()
    };
    let mut poller = Poller::new(site, at(11, 45), Vec::new(), settings, token.clone());

    let interrupter = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        interrupt(&token)
    });

    assert_eq!(poller.run().await.unwrap(), Outcome::Cancelled);
    assert_eq!(interrupter.await.unwrap(), Interrupt::Graceful);

    let (site, out) = poller.into_parts();
    assert_eq!(site.reads, 1);
    assert!(run_output(out).trim_end().ends_with("Context cancelled, exiting."));
}
