//! Moondust Intake — the guided submission workflow.
//!
//! Collects story type, wallet, contract, amount, and the free-text story
//! through a linear, navigable state machine, validating each field before
//! advancing, and writes an accepted submission as pending. Anti-abuse
//! throttling lives here too: one submission per account and per wallet per
//! rolling 24-hour window.

pub mod rate_limit;
pub mod validate;
pub mod workflow;

pub use workflow::{
    IntakeInput, IntakeOutcome, IntakeSession, IntakeStep, handle_input, start_intake,
};
