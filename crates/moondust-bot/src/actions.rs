//! Typed button-action payloads.
//!
//! Buttons carry a compact encoded string (`family_sub[_target]`) between a
//! rendered prompt and the next interaction. That payload is the only state
//! crossing the transport, and any actor could forge one, so it is decoded
//! here once, defensively, into a closed union. Authorization is always
//! re-checked server-side, never trusted from the payload.

use uuid::Uuid;

use moondust_core::error::DomainError;
use moondust_core::model::{Criterion, RejectionReason, StoryCategory};

/// Outcome buttons on the intake confirmation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// Write the submission.
    Submit,
    /// Abandon the workflow.
    Cancel,
    /// Return to the story step, keeping collected fields.
    EditStory,
}

/// Moderator buttons on a pending-submission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewChoice {
    /// Start the scoring wizard.
    Approve,
    /// Show the rejection-reason codes.
    Reject,
    /// Suppress this prompt; the submission stays pending.
    Skip,
    /// Back from the reason list to approve/reject.
    Back,
}

/// Moderator buttons inside the scoring wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringAction {
    /// A magnitude for one criterion.
    Select {
        /// The criterion the button belongs to.
        criterion: Criterion,
        /// The chosen magnitude.
        value: u32,
    },
    /// Re-enter the previous criterion.
    Back,
    /// Abandon scoring; the submission stays pending.
    Cancel,
    /// Finalize the approval from the summary.
    Confirm,
    /// Reset all scores and restart.
    Redo,
}

/// The closed set of button actions the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Story-category pick during intake.
    Category(StoryCategory),
    /// Intake confirmation outcome.
    Confirm(ConfirmChoice),
    /// Moderation decision affordance for one submission.
    Review {
        /// The chosen affordance.
        choice: ReviewChoice,
        /// The submission it targets.
        submission_id: Uuid,
    },
    /// Rejection-reason selection for one submission.
    RejectReason {
        /// The chosen reason code.
        reason: RejectionReason,
        /// The submission it targets.
        submission_id: Uuid,
    },
    /// Scoring-wizard interaction.
    Scoring(ScoringAction),
}

fn invalid(payload: &str) -> DomainError {
    DomainError::Validation(format!("unrecognized action payload: {payload}"))
}

impl Action {
    /// Decodes a payload string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for any malformed or unknown
    /// payload.
    pub fn decode(payload: &str) -> Result<Self, DomainError> {
        let (family, rest) = payload.split_once('_').ok_or_else(|| invalid(payload))?;
        match family {
            "type" => StoryCategory::from_key(rest)
                .map(Self::Category)
                .ok_or_else(|| invalid(payload)),
            "confirm" => match rest {
                "yes" => Ok(Self::Confirm(ConfirmChoice::Submit)),
                "no" => Ok(Self::Confirm(ConfirmChoice::Cancel)),
                "back" => Ok(Self::Confirm(ConfirmChoice::EditStory)),
                _ => Err(invalid(payload)),
            },
            "review" => {
                let (choice, id) = rest.split_once('_').ok_or_else(|| invalid(payload))?;
                let choice = match choice {
                    "approve" => ReviewChoice::Approve,
                    "reject" => ReviewChoice::Reject,
                    "skip" => ReviewChoice::Skip,
                    "back" => ReviewChoice::Back,
                    _ => return Err(invalid(payload)),
                };
                let submission_id = Uuid::parse_str(id).map_err(|_| invalid(payload))?;
                Ok(Self::Review {
                    choice,
                    submission_id,
                })
            }
            "reject" => {
                let (code, id) = rest.split_once('_').ok_or_else(|| invalid(payload))?;
                let reason = RejectionReason::from_code(code).ok_or_else(|| invalid(payload))?;
                let submission_id = Uuid::parse_str(id).map_err(|_| invalid(payload))?;
                Ok(Self::RejectReason {
                    reason,
                    submission_id,
                })
            }
            "score" => match rest {
                "back" => Ok(Self::Scoring(ScoringAction::Back)),
                "cancel" => Ok(Self::Scoring(ScoringAction::Cancel)),
                "confirm" => Ok(Self::Scoring(ScoringAction::Confirm)),
                "redo" => Ok(Self::Scoring(ScoringAction::Redo)),
                _ => {
                    let (key, value) = rest.split_once('_').ok_or_else(|| invalid(payload))?;
                    let criterion =
                        Criterion::from_key(key).ok_or_else(|| invalid(payload))?;
                    let value: u32 = value.parse().map_err(|_| invalid(payload))?;
                    Ok(Self::Scoring(ScoringAction::Select { criterion, value }))
                }
            },
            _ => Err(invalid(payload)),
        }
    }

    /// Encodes the action back into its payload string.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Category(category) => format!("type_{}", category.key()),
            Self::Confirm(ConfirmChoice::Submit) => "confirm_yes".to_owned(),
            Self::Confirm(ConfirmChoice::Cancel) => "confirm_no".to_owned(),
            Self::Confirm(ConfirmChoice::EditStory) => "confirm_back".to_owned(),
            Self::Review {
                choice,
                submission_id,
            } => {
                let choice = match choice {
                    ReviewChoice::Approve => "approve",
                    ReviewChoice::Reject => "reject",
                    ReviewChoice::Skip => "skip",
                    ReviewChoice::Back => "back",
                };
                format!("review_{choice}_{submission_id}")
            }
            Self::RejectReason {
                reason,
                submission_id,
            } => format!("reject_{}_{submission_id}", reason.code()),
            Self::Scoring(ScoringAction::Back) => "score_back".to_owned(),
            Self::Scoring(ScoringAction::Cancel) => "score_cancel".to_owned(),
            Self::Scoring(ScoringAction::Confirm) => "score_confirm".to_owned(),
            Self::Scoring(ScoringAction::Redo) => "score_redo".to_owned(),
            Self::Scoring(ScoringAction::Select { criterion, value }) => {
                format!("score_{}_{value}", criterion.key())
            }
        }
    }
}
