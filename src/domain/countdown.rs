//! Time remaining until an event.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Days, hours, minutes and seconds left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    /// Whole days.
    pub days: i64,
    /// Hours past the whole days.
    pub hours: i64,
    /// Minutes past the whole hours.
    pub minutes: i64,
    /// Seconds past the whole minutes.
    pub seconds: i64,
}

impl TimeLeft {
    fn from_seconds(total: i64) -> Self {
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

/// Countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Countdown {
    /// The target is still ahead.
    Counting(TimeLeft),
    /// The target has passed; the display stays at zero.
    Elapsed,
}

impl Countdown {
    /// Evaluates the countdown to `target` as seen at `now`.
    #[must_use]
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining = (target - now).num_seconds();
        if target > now && remaining > 0 {
            Self::Counting(TimeLeft::from_seconds(remaining))
        } else {
            Self::Elapsed
        }
    }

    /// The figures to display. Elapsed countdowns show zero.
    #[must_use]
    pub fn time_left(&self) -> TimeLeft {
        match self {
            Self::Counting(left) => *left,
            Self::Elapsed => TimeLeft::default(),
        }
    }

    /// Whether the target has passed.
    #[must_use]
    pub const fn is_elapsed(&self) -> bool {
        matches!(self, Self::Elapsed)
    }
}
