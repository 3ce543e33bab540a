//! Store abstractions.
//!
//! The persistence engine is an external collaborator; these traits are the
//! boundary the rest of the system programs against. Status transitions are
//! expressed as conditional writes keyed on the current status, so a race
//! between two decisions resolves to exactly one winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cycle::CycleId;
use crate::error::DomainError;
use crate::model::{
    Actor, ActorId, Champion, RejectionReason, ScoreBreakdown, StatusCounts, Submission,
    SubmissionStatus,
};

/// Store of actor records and their cumulative point balances.
#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Creates the actor on first sight, or refreshes the display name.
    async fn upsert(
        &self,
        id: ActorId,
        display_name: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Loads one actor.
    async fn get(&self, id: ActorId) -> Result<Option<Actor>, DomainError>;

    /// Adds `delta` (possibly negative, for reversals) to an actor's balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ActorNotFound` if the actor does not exist.
    async fn adjust_points(&self, id: ActorId, delta: i64) -> Result<(), DomainError>;

    /// Total number of actors.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Sum of all actor balances.
    async fn total_points_awarded(&self) -> Result<i64, DomainError>;

    /// Number of actors whose balance strictly exceeds `points`.
    async fn count_with_points_above(&self, points: i64) -> Result<u64, DomainError>;

    /// The top `limit` actors ordered by balance descending.
    async fn top_by_points(&self, limit: usize) -> Result<Vec<Actor>, DomainError>;
}

/// Store of submissions and their lifecycle transitions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persists a new pending submission.
    async fn insert(&self, submission: Submission) -> Result<(), DomainError>;

    /// Loads one submission.
    async fn get(&self, id: Uuid) -> Result<Option<Submission>, DomainError>;

    /// The oldest `limit` pending submissions, creation order.
    async fn list_pending(&self, limit: usize) -> Result<Vec<Submission>, DomainError>;

    /// Total number of submissions.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Number of submissions in the given status.
    async fn count_by_status(&self, status: SubmissionStatus) -> Result<u64, DomainError>;

    /// Number of submissions created in the given cycle.
    async fn count_in_cycle(&self, cycle: CycleId) -> Result<u64, DomainError>;

    /// Number of submissions created in the given cycle with the given status.
    async fn count_in_cycle_with_status(
        &self,
        cycle: CycleId,
        status: SubmissionStatus,
    ) -> Result<u64, DomainError>;

    /// Per-status counts of one actor's submissions.
    async fn status_counts_for_actor(&self, actor_id: ActorId) -> Result<StatusCounts, DomainError>;

    /// Whether the actor created any submission strictly after `since`.
    async fn exists_for_actor_since(
        &self,
        actor_id: ActorId,
        since: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Whether any submission with a case-insensitively matching wallet was
    /// created strictly after `since`.
    async fn exists_for_wallet_since(
        &self,
        wallet: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Conditional write `pending → approved` with the full breakdown; total
    /// is derived from the breakdown. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionNotFound` for an unknown id and
    /// `DomainError::StatusConflict` if the submission is no longer pending.
    async fn approve_if_pending(
        &self,
        id: Uuid,
        scores: ScoreBreakdown,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError>;

    /// Conditional write `pending → rejected` with a coded reason. Returns
    /// the updated record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionNotFound` for an unknown id and
    /// `DomainError::StatusConflict` if the submission is no longer pending.
    async fn reject_if_pending(
        &self,
        id: Uuid,
        reason: RejectionReason,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError>;

    /// Administrative reversal: resets the submission to pending, clearing
    /// reason, scores, total, and review timestamp. Returns the record as it
    /// was before the reset so the caller can reverse credited points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SubmissionNotFound` for an unknown id.
    async fn reset_to_pending(&self, id: Uuid) -> Result<Submission, DomainError>;

    /// The approved submission of the cycle with the highest total, ties
    /// broken by earliest creation timestamp.
    async fn top_approved_in_cycle(
        &self,
        cycle: CycleId,
    ) -> Result<Option<Submission>, DomainError>;
}

/// Store of champion records, one per cycle.
#[async_trait]
pub trait ChampionRepository: Send + Sync {
    /// Persists a champion for a cycle that has none yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ChampionAlreadySelected` if the cycle already
    /// has a champion; the existing record is never overwritten.
    async fn insert_new(&self, champion: Champion) -> Result<(), DomainError>;

    /// Loads the champion of one cycle.
    async fn get_by_cycle(&self, cycle: CycleId) -> Result<Option<Champion>, DomainError>;

    /// The most recent `limit` champions, newest cycle first.
    async fn recent(&self, limit: usize) -> Result<Vec<Champion>, DomainError>;

    /// Total number of champions crowned.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Number of cycles the actor has won.
    async fn wins_for_actor(&self, actor_id: ActorId) -> Result<u64, DomainError>;
}
