//! Moondust Review — the human moderation pipeline.
//!
//! A single privileged moderator drives each pending submission to approved
//! (through the scoring wizard) or rejected (with a coded reason), or defers
//! it. Decisions are conditional writes keyed on the pending status, so two
//! racing decisions resolve to exactly one winner.

pub mod moderation;
pub mod scoring;

pub use moderation::{begin_scoring, finalize_approval, reject_submission, reverse_submission};
pub use scoring::{ScoringSession, ScoringStep};
