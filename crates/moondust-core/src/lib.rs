//! Moondust Core — shared domain abstractions.
//!
//! This crate defines the types and traits that every other Moondust crate
//! depends on: the domain records, the error taxonomy, the clock and store
//! seams, and the weekly cycle rules. It contains no infrastructure code.

pub mod clock;
pub mod cycle;
pub mod error;
pub mod model;
pub mod notify;
pub mod repository;
