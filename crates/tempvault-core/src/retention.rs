//! Retention policy: maps a retention label to a fixed duration.
//!
//! The label set is closed. Parsing a label is the only fallible step and
//! happens at the boundary; everything after that is total.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const HOUR_MS: i64 = 60 * 60 * 1000;

/// How long a vault lives after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum RetentionPeriod {
    OneHour,
    TwoHours,
    EightHours,
    TwentyFourHours,
    FortyEightHours,
    FourDays,
    OneWeek,
}

impl RetentionPeriod {
    /// Every label, shortest first.
    pub const ALL: [RetentionPeriod; 7] = [
        RetentionPeriod::OneHour,
        RetentionPeriod::TwoHours,
        RetentionPeriod::EightHours,
        RetentionPeriod::TwentyFourHours,
        RetentionPeriod::FortyEightHours,
        RetentionPeriod::FourDays,
        RetentionPeriod::OneWeek,
    ];

    /// The wire label, e.g. `"24hours"`.
    pub const fn as_label(self) -> &'static str {
        match self {
            RetentionPeriod::OneHour => "1hour",
            RetentionPeriod::TwoHours => "2hours",
            RetentionPeriod::EightHours => "8hours",
            RetentionPeriod::TwentyFourHours => "24hours",
            RetentionPeriod::FortyEightHours => "48hours",
            RetentionPeriod::FourDays => "4days",
            RetentionPeriod::OneWeek => "1week",
        }
    }

    /// Retention in milliseconds.
    pub const fn duration_ms(self) -> i64 {
        match self {
            RetentionPeriod::OneHour => HOUR_MS,
            RetentionPeriod::TwoHours => 2 * HOUR_MS,
            RetentionPeriod::EightHours => 8 * HOUR_MS,
            RetentionPeriod::TwentyFourHours => 24 * HOUR_MS,
            RetentionPeriod::FortyEightHours => 48 * HOUR_MS,
            RetentionPeriod::FourDays => 4 * 24 * HOUR_MS,
            RetentionPeriod::OneWeek => 7 * 24 * HOUR_MS,
        }
    }

    /// Retention as a [`Duration`].
    pub const fn duration(self) -> Duration {
        Duration::from_millis(self.duration_ms() as u64)
    }
}

/// Absolute expiry for a record created at `created_at` (Unix ms).
pub const fn compute_expiry(created_at: i64, period: RetentionPeriod) -> i64 {
    created_at.saturating_add(period.duration_ms())
}

impl fmt::Display for RetentionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for RetentionPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RetentionPeriod::ALL
            .into_iter()
            .find(|p| p.as_label() == s)
            .ok_or_else(|| CoreError::InvalidRetentionLabel(s.to_owned()))
    }
}

impl TryFrom<String> for RetentionPeriod {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RetentionPeriod> for &'static str {
    fn from(period: RetentionPeriod) -> Self {
        period.as_label()
    }
}
