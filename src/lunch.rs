//! Lunch-time classification of the local wall clock.

use chrono::{Local, NaiveTime};
use serde::Deserialize;
use std::fmt;

/// Where the current time falls relative to the lunch window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LunchTime {
    Early,
    OnTime,
    Late,
}

impl LunchTime {
    /// Advisory line printed before a status check, if any.
    pub fn advisory(self) -> Option<&'static str> {
        match self {
            Self::Early => {
                Some("Checking Relish, but it's a little early for lunch... someone is hungry!")
            }
            Self::Late => {
                Some("Checking Relish, but it's a little late for lunch... might wanna talk to Shawn!")
            }
            Self::OnTime => None,
        }
    }
}

impl fmt::Display for LunchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Early => write!(f, "EARLY"),
            Self::OnTime => write!(f, "ON-TIME"),
            Self::Late => write!(f, "LATE"),
        }
    }
}

/// Half-open `[start, end)` window of local time that counts as on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LunchWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for LunchWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(11, 30, 0).expect("valid lunch start"),
            end: NaiveTime::from_hms_opt(12, 0, 0).expect("valid lunch end"),
        }
    }
}

impl LunchWindow {
    /// Classify a time of day. `start` itself is on time, `end` itself is late.
    pub fn classify(&self, time: NaiveTime) -> LunchTime {
        if time < self.start {
            LunchTime::Early
        } else if time >= self.end {
            LunchTime::Late
        } else {
            LunchTime::OnTime
        }
    }
}

/// Source of the current local time of day.
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// Wall clock in the system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}
