use std::fmt;

const PLACED: &str = "Order Placed";
const PREPARING: &str = "Preparing Your Order";
const ARRIVED: &str = "Order Arrived";

/// Order status as shown on the schedule page label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Placed,
    Preparing,
    Arrived,
    Unknown,
}

impl OrderStatus {
    /// Interpret the raw label text.
    ///
    /// Arrival is detected by substring, since the label carries a delivery
    /// time after the marker ("Order Arrived at 12:15pm").
    pub fn parse(text: &str) -> Self {
        if text.contains(ARRIVED) {
            return Self::Arrived;
        }
        match text.trim() {
            PLACED => Self::Placed,
            PREPARING => Self::Preparing,
            _ => Self::Unknown,
        }
    }

    pub fn is_arrived(self) -> bool {
        self == Self::Arrived
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Placed => PLACED,
            Self::Preparing => PREPARING,
            Self::Arrived => ARRIVED,
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}
