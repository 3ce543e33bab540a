//! Shared test mocks and utilities for the Moondust story service.

mod clock;
mod notify;

pub use clock::FixedClock;
pub use notify::{FailingNotifier, RecordingNotifier};
