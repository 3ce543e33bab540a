//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::cycle::CycleId;
use crate::model::{ActorId, SubmissionStatus};

/// Which rate-limit check denied an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    /// The actor identity already submitted within the window.
    Actor,
    /// The wallet already appeared in a submission within the window.
    Wallet,
}

impl std::fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Actor => write!(f, "account"),
            Self::Wallet => write!(f, "wallet"),
        }
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No submission exists with the given id.
    #[error("submission not found: {0}")]
    SubmissionNotFound(Uuid),

    /// No actor exists with the given id.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// A decision targeted a submission that is no longer in the expected
    /// status. Races between two decisions resolve to exactly one winner;
    /// the loser sees this error and nothing is written.
    #[error("submission {submission_id} is {actual}, expected {expected}")]
    StatusConflict {
        /// The submission that had the conflict.
        submission_id: Uuid,
        /// The status the decision expected to find.
        expected: SubmissionStatus,
        /// The status actually found.
        actual: SubmissionStatus,
    },

    /// A field failed its shape or length rules.
    #[error("validation error: {0}")]
    Validation(String),

    /// The actor or wallet cooldown window has not elapsed.
    #[error("rate limited: one submission per {scope} per 24 hours")]
    RateLimited {
        /// The scope that triggered the denial.
        scope: RateLimitScope,
    },

    /// The acting identity is not the configured moderator.
    #[error("not authorized")]
    Unauthorized,

    /// The weekly blackout window is active.
    #[error("submissions are closed for review")]
    SubmissionsClosed,

    /// No approved submission exists for the cycle.
    #[error("no eligible winner for cycle {0}")]
    NoEligibleWinner(CycleId),

    /// A champion record already exists for the cycle.
    #[error("champion already selected for cycle {0}")]
    ChampionAlreadySelected(CycleId),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
