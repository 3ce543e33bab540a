//! Transport-agnostic interaction dispatcher.
//!
//! One incoming interaction (a slash command, a plain text message, or a
//! button press) goes in; the replies for the invoking actor come out.
//! Cross-actor notifications (the moderator's review prompt, approval and
//! rejection notices, the champion announcement) go out through the
//! [`Notifier`] and are strictly best-effort: a delivery failure is logged
//! and swallowed, never rolled back into the state transition.
//!
//! Expected domain refusals (validation, cooldowns, authorization, decided
//! races) are recovered into friendly replies; only infrastructure errors
//! propagate to the caller as `Err`.

use std::sync::Arc;

use uuid::Uuid;

use moondust_core::clock::Clock;
use moondust_core::error::DomainError;
use moondust_core::model::{ActorId, ModeratorId, Submission};
use moondust_core::notify::{Notifier, Outbound};
use moondust_core::repository::{ActorRepository, ChampionRepository, SubmissionRepository};
use moondust_intake::{self as intake, IntakeInput, IntakeOutcome, IntakeSession};
use moondust_leaderboard as leaderboard;
use moondust_review as review;

use crate::actions::{Action, ConfirmChoice, ReviewChoice, ScoringAction};
use crate::render;
use crate::sessions::{Session, SessionStore};

/// How many pending submissions one `/pending` call lists.
const PENDING_LIMIT: usize = 10;

/// The slash commands the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin the guided submission workflow.
    Start,
    /// Abandon whatever workflow is in progress.
    Cancel,
    /// Step back one state in the current workflow.
    Back,
    /// Personal statistics.
    MyStats,
    /// The top-10 leaderboard.
    Leaderboard,
    /// Champion history.
    Champions,
    /// Current-cycle status.
    Week,
    /// Moderator: list pending submissions.
    Pending,
    /// Moderator: review-queue and cycle status.
    Status,
    /// Moderator: whole-system totals.
    Stats,
    /// Moderator: crown the current cycle's champion.
    Champion,
    /// Moderator: reset a decided submission back to pending.
    Undo(Uuid),
    /// `/undo` with a missing or malformed id; answered with usage.
    UndoUsage,
}

impl Command {
    /// Parses a slash command, or `None` for anything else.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split_whitespace();
        let head = parts.next()?;
        match head {
            "/start" | "/submit" => Some(Self::Start),
            "/cancel" => Some(Self::Cancel),
            "/back" => Some(Self::Back),
            "/mystats" => Some(Self::MyStats),
            "/leaderboard" => Some(Self::Leaderboard),
            "/champions" => Some(Self::Champions),
            "/week" => Some(Self::Week),
            "/pending" => Some(Self::Pending),
            "/status" => Some(Self::Status),
            "/stats" => Some(Self::Stats),
            "/champion" => Some(Self::Champion),
            "/undo" => Some(
                parts
                    .next()
                    .and_then(|id| Uuid::parse_str(id).ok())
                    .map_or(Self::UndoUsage, Self::Undo),
            ),
            _ => None,
        }
    }
}

/// Everything an interaction needs, bundled behind `Arc` seams so one
/// dispatcher serves the whole process.
pub struct Dispatcher {
    clock: Arc<dyn Clock>,
    actors: Arc<dyn ActorRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    champions: Arc<dyn ChampionRepository>,
    notifier: Arc<dyn Notifier>,
    sessions: SessionStore,
    moderator: ModeratorId,
}

impl Dispatcher {
    /// Wires a dispatcher from its collaborators.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        actors: Arc<dyn ActorRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        champions: Arc<dyn ChampionRepository>,
        notifier: Arc<dyn Notifier>,
        moderator: ModeratorId,
    ) -> Self {
        Self {
            clock,
            actors,
            submissions,
            champions,
            notifier,
            sessions: SessionStore::new(),
            moderator,
        }
    }

    /// Handles one plain text message: a slash command if it parses as one,
    /// otherwise input into the actor's live workflow.
    ///
    /// # Errors
    ///
    /// Returns only `DomainError::Infrastructure`; every expected refusal is
    /// recovered into a reply.
    pub async fn handle_text(
        &self,
        actor_id: ActorId,
        display_name: &str,
        text: &str,
    ) -> Result<Vec<Outbound>, DomainError> {
        if let Some(command) = Command::parse(text) {
            return self.handle_command(actor_id, display_name, command).await;
        }
        recover(self.text_input(actor_id, text).await)
    }

    /// Handles one slash command.
    ///
    /// # Errors
    ///
    /// Returns only `DomainError::Infrastructure`.
    pub async fn handle_command(
        &self,
        actor_id: ActorId,
        display_name: &str,
        command: Command,
    ) -> Result<Vec<Outbound>, DomainError> {
        recover(self.command(actor_id, display_name, command).await)
    }

    /// Handles one button press carrying an encoded action payload.
    ///
    /// # Errors
    ///
    /// Returns only `DomainError::Infrastructure`.
    pub async fn handle_action(
        &self,
        actor_id: ActorId,
        payload: &str,
    ) -> Result<Vec<Outbound>, DomainError> {
        recover(self.action(actor_id, payload).await)
    }

    async fn command(
        &self,
        actor_id: ActorId,
        display_name: &str,
        command: Command,
    ) -> Result<Vec<Outbound>, DomainError> {
        match command {
            Command::Start => {
                // A stale run is replaced, not resumed.
                self.sessions.clear(actor_id)?;
                let session = intake::start_intake(
                    actor_id,
                    display_name,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                    self.actors.as_ref(),
                )
                .await?;
                let prompt = render::intake_prompt(&session, session.step);
                self.sessions.put(actor_id, Session::Intake(session))?;
                Ok(vec![prompt])
            }
            Command::Cancel => {
                self.sessions.clear(actor_id)?;
                Ok(vec![render::cancelled()])
            }
            Command::Back => match self.sessions.take(actor_id)? {
                Some(Session::Intake(mut session)) => {
                    let outcome = intake::handle_input(
                        &mut session,
                        IntakeInput::Back,
                        self.clock.as_ref(),
                        self.submissions.as_ref(),
                    )
                    .await?;
                    self.intake_outcome(actor_id, session, outcome).await
                }
                Some(Session::Scoring(mut session)) => {
                    session.back();
                    let prompt = render::scoring_prompt(&session);
                    self.sessions.put(actor_id, Session::Scoring(session))?;
                    Ok(vec![prompt])
                }
                None => Ok(vec![render::idle_hint()]),
            },
            Command::MyStats => {
                let stats = leaderboard::personal_stats(
                    actor_id,
                    display_name,
                    self.actors.as_ref(),
                    self.submissions.as_ref(),
                    self.champions.as_ref(),
                )
                .await?;
                Ok(vec![render::personal_stats(&stats)])
            }
            Command::Leaderboard => {
                let view = leaderboard::leaderboard(actor_id, self.actors.as_ref()).await?;
                Ok(vec![render::leaderboard(&view)])
            }
            Command::Champions => {
                let history = leaderboard::champion_history(self.champions.as_ref()).await?;
                Ok(vec![render::champions(&history)])
            }
            Command::Week => {
                let view =
                    leaderboard::cycle_status(self.clock.as_ref(), self.submissions.as_ref())
                        .await?;
                Ok(vec![render::cycle_status(&view)])
            }
            Command::Pending => {
                self.moderator.authorize(actor_id)?;
                let pending = self.submissions.list_pending(PENDING_LIMIT).await?;
                if pending.is_empty() {
                    return Ok(vec![Outbound::text("No pending submissions.")]);
                }
                let mut replies =
                    vec![Outbound::text(format!("{} pending:", pending.len()))];
                replies.extend(pending.iter().map(render::pending_entry));
                Ok(replies)
            }
            Command::Status => {
                let view = leaderboard::moderation_status(
                    actor_id,
                    self.moderator,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                )
                .await?;
                Ok(vec![render::moderation_status(&view)])
            }
            Command::Stats => {
                let view = leaderboard::full_stats(
                    actor_id,
                    self.moderator,
                    self.actors.as_ref(),
                    self.submissions.as_ref(),
                    self.champions.as_ref(),
                )
                .await?;
                Ok(vec![render::full_stats(&view)])
            }
            Command::Champion => {
                let champion = leaderboard::select_champion(
                    actor_id,
                    self.moderator,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                    self.champions.as_ref(),
                )
                .await?;
                self.notify(champion.actor_id, render::champion_announcement(&champion))
                    .await;
                Ok(vec![render::champion_selected(&champion)])
            }
            Command::Undo(id) => {
                let before = review::reverse_submission(
                    actor_id,
                    self.moderator,
                    id,
                    self.submissions.as_ref(),
                    self.actors.as_ref(),
                )
                .await?;
                Ok(vec![Outbound::text(format!(
                    "Submission {id} reset to pending (was {}, {} points reversed).",
                    before.status, before.total_points
                ))])
            }
            Command::UndoUsage => {
                self.moderator.authorize(actor_id)?;
                Ok(vec![Outbound::text("Usage: /undo <submission-id>")])
            }
        }
    }

    async fn text_input(
        &self,
        actor_id: ActorId,
        text: &str,
    ) -> Result<Vec<Outbound>, DomainError> {
        match self.sessions.take(actor_id)? {
            Some(Session::Intake(mut session)) => {
                let outcome = intake::handle_input(
                    &mut session,
                    IntakeInput::Text(text),
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                )
                .await?;
                self.intake_outcome(actor_id, session, outcome).await
            }
            Some(scoring @ Session::Scoring(_)) => {
                // Scoring is button-driven; typed text leaves it untouched.
                self.sessions.put(actor_id, scoring)?;
                Ok(vec![Outbound::text("Use the buttons to score.")])
            }
            None => Ok(vec![render::idle_hint()]),
        }
    }

    async fn action(
        &self,
        actor_id: ActorId,
        payload: &str,
    ) -> Result<Vec<Outbound>, DomainError> {
        match Action::decode(payload)? {
            Action::Category(category) => {
                self.intake_input(actor_id, IntakeInput::ChooseCategory(category))
                    .await
            }
            Action::Confirm(choice) => {
                let input = match choice {
                    ConfirmChoice::Submit => IntakeInput::ConfirmSubmit,
                    ConfirmChoice::Cancel => IntakeInput::ConfirmCancel,
                    ConfirmChoice::EditStory => IntakeInput::EditStory,
                };
                self.intake_input(actor_id, input).await
            }
            Action::Review {
                choice,
                submission_id,
            } => self.review(actor_id, choice, submission_id).await,
            Action::RejectReason {
                reason,
                submission_id,
            } => {
                let rejected = review::reject_submission(
                    actor_id,
                    self.moderator,
                    submission_id,
                    reason,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                )
                .await?;
                self.notify(rejected.actor_id, render::rejection_notice(&rejected))
                    .await;
                Ok(vec![Outbound::text(format!(
                    "Rejected: {}.",
                    reason.label()
                ))])
            }
            Action::Scoring(action) => self.scoring(actor_id, action).await,
        }
    }

    async fn intake_input(
        &self,
        actor_id: ActorId,
        input: IntakeInput<'_>,
    ) -> Result<Vec<Outbound>, DomainError> {
        match self.sessions.take(actor_id)? {
            Some(Session::Intake(mut session)) => {
                let outcome = intake::handle_input(
                    &mut session,
                    input,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                )
                .await?;
                self.intake_outcome(actor_id, session, outcome).await
            }
            Some(other) => {
                self.sessions.put(actor_id, other)?;
                Ok(vec![render::idle_hint()])
            }
            None => Ok(vec![render::idle_hint()]),
        }
    }

    async fn intake_outcome(
        &self,
        actor_id: ActorId,
        session: IntakeSession,
        outcome: IntakeOutcome,
    ) -> Result<Vec<Outbound>, DomainError> {
        match outcome {
            IntakeOutcome::Prompt(step) => {
                let prompt = render::intake_prompt(&session, step);
                self.sessions.put(actor_id, Session::Intake(session))?;
                Ok(vec![prompt])
            }
            IntakeOutcome::Invalid { step, message } => {
                let replies = render::invalid_reprompt(&session, step, &message);
                self.sessions.put(actor_id, Session::Intake(session))?;
                Ok(replies)
            }
            IntakeOutcome::RateLimited(scope) => {
                Ok(vec![render::error_reply(&DomainError::RateLimited { scope })])
            }
            IntakeOutcome::Cancelled => Ok(vec![render::cancelled()]),
            IntakeOutcome::Submitted(submission) => {
                self.notify(self.moderator.0, render::moderator_notification(&submission))
                    .await;
                Ok(vec![render::submission_received(&submission)])
            }
        }
    }

    async fn review(
        &self,
        actor_id: ActorId,
        choice: ReviewChoice,
        submission_id: Uuid,
    ) -> Result<Vec<Outbound>, DomainError> {
        self.moderator.authorize(actor_id)?;
        match choice {
            ReviewChoice::Approve => {
                let session = review::begin_scoring(
                    actor_id,
                    self.moderator,
                    submission_id,
                    self.submissions.as_ref(),
                )
                .await?;
                let prompt = render::scoring_prompt(&session);
                self.sessions.put(actor_id, Session::Scoring(session))?;
                Ok(vec![prompt])
            }
            ReviewChoice::Reject => Ok(vec![render::rejection_reasons(submission_id)]),
            ReviewChoice::Skip => Ok(vec![Outbound::text("Skipped; it stays in the queue.")]),
            ReviewChoice::Back => {
                let submission = self
                    .submissions
                    .get(submission_id)
                    .await?
                    .ok_or(DomainError::SubmissionNotFound(submission_id))?;
                Ok(vec![render::pending_entry(&submission)])
            }
        }
    }

    async fn scoring(
        &self,
        actor_id: ActorId,
        action: ScoringAction,
    ) -> Result<Vec<Outbound>, DomainError> {
        self.moderator.authorize(actor_id)?;
        let Some(Session::Scoring(mut session)) = self.sessions.take(actor_id)? else {
            return Ok(vec![Outbound::text(
                "No scoring in progress. Open a pending submission first.",
            )]);
        };
        match action {
            ScoringAction::Select { criterion, value } => {
                // A stale button from an earlier step re-prompts instead of
                // scoring the wrong criterion.
                if session.current_criterion() != Some(criterion) {
                    let prompt = render::scoring_prompt(&session);
                    self.sessions.put(actor_id, Session::Scoring(session))?;
                    return Ok(vec![prompt]);
                }
                if let Err(error) = session.select(value) {
                    let replies =
                        vec![render::error_reply(&error), render::scoring_prompt(&session)];
                    self.sessions.put(actor_id, Session::Scoring(session))?;
                    return Ok(replies);
                }
                let prompt = render::scoring_prompt(&session);
                self.sessions.put(actor_id, Session::Scoring(session))?;
                Ok(vec![prompt])
            }
            ScoringAction::Back => {
                session.back();
                let prompt = render::scoring_prompt(&session);
                self.sessions.put(actor_id, Session::Scoring(session))?;
                Ok(vec![prompt])
            }
            ScoringAction::Redo => {
                session.redo();
                let prompt = render::scoring_prompt(&session);
                self.sessions.put(actor_id, Session::Scoring(session))?;
                Ok(vec![prompt])
            }
            ScoringAction::Cancel => Ok(vec![Outbound::text(
                "Scoring cancelled; the submission stays pending.",
            )]),
            ScoringAction::Confirm => {
                let result = review::finalize_approval(
                    actor_id,
                    self.moderator,
                    &session,
                    self.clock.as_ref(),
                    self.submissions.as_ref(),
                    self.actors.as_ref(),
                )
                .await;
                match result {
                    Ok(approved) => self.approved_replies(&approved).await,
                    // A premature confirm must not cost the scores already
                    // entered; keep the session and re-prompt where it stands.
                    Err(error @ DomainError::Validation(_)) => {
                        let replies =
                            vec![render::error_reply(&error), render::scoring_prompt(&session)];
                        self.sessions.put(actor_id, Session::Scoring(session))?;
                        Ok(replies)
                    }
                    Err(other) => Err(other),
                }
            }
        }
    }

    async fn approved_replies(
        &self,
        approved: &Submission,
    ) -> Result<Vec<Outbound>, DomainError> {
        self.notify(approved.actor_id, render::approval_notice(approved))
            .await;
        Ok(vec![Outbound::text(format!(
            "Approved: {} points credited to {}.",
            approved.total_points, approved.display_name
        ))])
    }

    async fn notify(&self, recipient: ActorId, message: Outbound) {
        if let Err(error) = self.notifier.send(recipient, message).await {
            tracing::warn!(%recipient, %error, "notification dropped");
        }
    }
}

/// Expected refusals become replies; infrastructure errors stay errors.
fn recover(result: Result<Vec<Outbound>, DomainError>) -> Result<Vec<Outbound>, DomainError> {
    match result {
        Ok(replies) => Ok(replies),
        Err(error @ DomainError::Infrastructure(_)) => Err(error),
        Err(expected) => Ok(vec![render::error_reply(&expected)]),
    }
}
