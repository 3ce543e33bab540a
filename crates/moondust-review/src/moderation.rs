//! Moderation pipeline: per-submission decisions by the single moderator.
//!
//! Every action authorizes against the configured moderator identity first.
//! Approve and reject are conditional writes keyed on the pending status;
//! crediting happens only after the conditional write succeeds, so a race
//! between two decision events never double-applies.

use uuid::Uuid;

use moondust_core::clock::Clock;
use moondust_core::error::DomainError;
use moondust_core::model::{ActorId, ModeratorId, RejectionReason, Submission, SubmissionStatus};
use moondust_core::repository::{ActorRepository, SubmissionRepository};

use crate::scoring::ScoringSession;

/// Opens a scoring session for a pending submission.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator,
/// `DomainError::SubmissionNotFound` for an unknown id, and
/// `DomainError::StatusConflict` if the submission is no longer pending.
pub async fn begin_scoring(
    acting: ActorId,
    moderator: ModeratorId,
    id: Uuid,
    submissions: &dyn SubmissionRepository,
) -> Result<ScoringSession, DomainError> {
    moderator.authorize(acting)?;
    let submission = submissions
        .get(id)
        .await?
        .ok_or(DomainError::SubmissionNotFound(id))?;
    if submission.status != SubmissionStatus::Pending {
        return Err(DomainError::StatusConflict {
            submission_id: id,
            expected: SubmissionStatus::Pending,
            actual: submission.status,
        });
    }
    Ok(ScoringSession::new(id))
}

/// Rejects a pending submission with a coded reason.
///
/// Returns the updated record so the caller can notify the actor.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator, and the
/// conditional-write errors of the store for unknown or already-decided ids.
pub async fn reject_submission(
    acting: ActorId,
    moderator: ModeratorId,
    id: Uuid,
    reason: RejectionReason,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<Submission, DomainError> {
    moderator.authorize(acting)?;
    let rejected = submissions
        .reject_if_pending(id, reason, clock.now())
        .await?;
    tracing::info!(submission_id = %id, reason = reason.code(), "submission rejected");
    Ok(rejected)
}

/// Finalizes an approval from a completed scoring session: writes the
/// breakdown and total with the status transition, then credits the total to
/// the submitting actor's balance.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator,
/// `DomainError::Validation` if the session is not complete, and the
/// conditional-write errors of the store for already-decided submissions,
/// in which case nothing is credited.
pub async fn finalize_approval(
    acting: ActorId,
    moderator: ModeratorId,
    session: &ScoringSession,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
    actors: &dyn ActorRepository,
) -> Result<Submission, DomainError> {
    moderator.authorize(acting)?;
    let breakdown = session.breakdown().ok_or_else(|| {
        DomainError::Validation("scoring is incomplete; all five criteria required".to_owned())
    })?;

    let approved = submissions
        .approve_if_pending(session.submission_id, breakdown, clock.now())
        .await?;
    // Credit only after the conditional write has decided the race.
    actors
        .adjust_points(approved.actor_id, i64::from(approved.total_points))
        .await?;
    tracing::info!(
        submission_id = %approved.id,
        actor_id = %approved.actor_id,
        total = approved.total_points,
        "submission approved"
    );
    Ok(approved)
}

/// Administrative reversal: resets a decided submission to pending and
/// debits any previously credited points, netting the actor's balance back
/// to its pre-approval value.
///
/// Returns the record as it was before the reset.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator and
/// `DomainError::SubmissionNotFound` for an unknown id.
pub async fn reverse_submission(
    acting: ActorId,
    moderator: ModeratorId,
    id: Uuid,
    submissions: &dyn SubmissionRepository,
    actors: &dyn ActorRepository,
) -> Result<Submission, DomainError> {
    moderator.authorize(acting)?;
    let before = submissions.reset_to_pending(id).await?;
    if before.status == SubmissionStatus::Approved && before.total_points > 0 {
        actors
            .adjust_points(before.actor_id, -i64::from(before.total_points))
            .await?;
    }
    tracing::info!(
        submission_id = %id,
        previous_status = %before.status,
        points_reversed = before.total_points,
        "submission reset to pending"
    );
    Ok(before)
}
