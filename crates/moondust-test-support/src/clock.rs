//! Deterministic clock for tests.

use chrono::{DateTime, Utc};
use moondust_core::clock::Clock;

/// A clock pinned to one instant.
///
/// The inner value is public on purpose: cooldown-window and cycle-boundary
/// cases build "later" clocks by adding a `Duration` to it.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
