//! Time source seam.
//!
//! Every time-dependent rule reads the current instant through this trait:
//! cycle stamping, the Saturday blackout, the 24-hour cooldown windows, and
//! review timestamps. Tests pin time with a fixed implementation; the
//! running service uses [`SystemClock`].

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock the binary runs on.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
