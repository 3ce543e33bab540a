//! Moondust Bot — the application layer.
//!
//! Wires the intake workflow, moderation pipeline, scoring engine, and
//! leaderboard behind a transport-agnostic dispatcher: typed commands and
//! defensively decoded button payloads in, renderable messages out. The
//! chat transport itself is an external collaborator; this crate only
//! exposes the liveness endpoint over HTTP.

pub mod actions;
pub mod dispatcher;
pub mod error;
pub mod notify;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;
