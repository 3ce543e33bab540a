//! Weekly cycle identity and the submission window rule.
//!
//! Submissions are grouped by the ISO week they were created in. One day of
//! each cycle, the whole of UTC Saturday, is the review blackout: intake
//! refuses to start, the moderator reviews, and the champion is announced.
//! The cutoff is Saturday 00:00:00 UTC sharp, so there is no minute-level
//! boundary ambiguity.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Identifier of a weekly cycle: the ISO week a submission was created in.
///
/// Carries the ISO year alongside the week number so that week 1 of one
/// year never collides with week 1 of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CycleId {
    /// ISO week-numbering year.
    pub year: i32,
    /// ISO week number (1–53).
    pub week: u32,
}

impl CycleId {
    /// Returns the cycle a given instant falls in.
    #[must_use]
    pub fn of(instant: DateTime<Utc>) -> Self {
        let iso = instant.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Returns whether intake is open at the given instant.
///
/// Closed for the entire UTC Saturday; open the other six days.
#[must_use]
pub fn submissions_open(now: DateTime<Utc>) -> bool {
    now.weekday() != Weekday::Sat
}

/// Time remaining until the next Saturday 00:00:00 UTC cutoff.
///
/// Returns zero during the blackout itself.
#[must_use]
pub fn time_until_close(now: DateTime<Utc>) -> Duration {
    if !submissions_open(now) {
        return Duration::zero();
    }
    let days_ahead = i64::from(
        (Weekday::Sat.num_days_from_monday() + 7 - now.weekday().num_days_from_monday()) % 7,
    );
    let cutoff = (now + Duration::days(days_ahead))
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    cutoff - now
}
