//! Intake workflow: a linear, resumable, navigable state machine.
//!
//! `ChooseType → Wallet → Contract → Amount → Story → Confirm`, with
//! terminal exits at every state. Validation is re-entrant per field: a
//! failure re-prompts the same state instead of aborting the flow. The
//! wallet cooldown is checked the moment the wallet is supplied, not at
//! final submit, so a denied actor does not waste effort composing a story.

use uuid::Uuid;

use moondust_core::clock::Clock;
use moondust_core::cycle::{self, CycleId};
use moondust_core::error::{DomainError, RateLimitScope};
use moondust_core::model::{ActorId, ScoreBreakdown, StoryCategory, Submission, SubmissionStatus};
use moondust_core::repository::{ActorRepository, SubmissionRepository};

use crate::rate_limit;
use crate::validate;

/// The non-terminal states of the intake workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStep {
    /// Pick one of the two story categories.
    ChooseType,
    /// Enter the wallet identifier.
    Wallet,
    /// Enter the contract identifier.
    Contract,
    /// Enter the free-text amount.
    Amount,
    /// Enter the story body.
    Story,
    /// Review the summary and submit, cancel, or edit the story.
    Confirm,
}

/// Transient per-actor scratch state for an in-progress intake run.
///
/// Not durable: lost on restart, and the actor restarts the flow.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    /// The actor running the workflow.
    pub actor_id: ActorId,
    /// Display name captured at workflow start.
    pub display_name: String,
    /// Current step.
    pub step: IntakeStep,
    /// Collected category, once chosen.
    pub category: Option<StoryCategory>,
    /// Collected wallet, once accepted.
    pub wallet: Option<String>,
    /// Collected contract, once accepted.
    pub contract: Option<String>,
    /// Collected amount, once accepted.
    pub amount: Option<String>,
    /// Collected story, once accepted.
    pub story: Option<String>,
}

impl IntakeSession {
    fn new(actor_id: ActorId, display_name: String) -> Self {
        Self {
            actor_id,
            display_name,
            step: IntakeStep::ChooseType,
            category: None,
            wallet: None,
            contract: None,
            amount: None,
            story: None,
        }
    }
}

/// One actor interaction fed into the state machine.
#[derive(Debug, Clone, Copy)]
pub enum IntakeInput<'a> {
    /// A category button press.
    ChooseCategory(StoryCategory),
    /// A typed message.
    Text(&'a str),
    /// Step back one state.
    Back,
    /// Abandon the workflow.
    Cancel,
    /// Submit from the confirmation summary.
    ConfirmSubmit,
    /// Cancel from the confirmation summary.
    ConfirmCancel,
    /// Return to the story step, keeping all collected fields.
    EditStory,
}

/// Result of feeding one input into the state machine.
#[derive(Debug)]
pub enum IntakeOutcome {
    /// The workflow advanced (or re-entered) this step; session continues.
    Prompt(IntakeStep),
    /// The input failed validation; re-prompt the same step with `message`.
    Invalid {
        /// The step to re-prompt.
        step: IntakeStep,
        /// What was wrong.
        message: String,
    },
    /// A cooldown denial surfaced mid-flow. Terminal; session is discarded.
    RateLimited(RateLimitScope),
    /// The actor cancelled. Terminal.
    Cancelled,
    /// The collected session was written as a pending submission. Terminal.
    Submitted(Submission),
}

impl IntakeOutcome {
    /// Whether the session should be discarded after this outcome.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Cancelled | Self::Submitted(_)
        )
    }
}

/// Entry point of the workflow: gated on the weekly blackout and the actor
/// cooldown, both checked before `ChooseType` is entered. Ensures the actor
/// record exists.
///
/// # Errors
///
/// Returns `DomainError::SubmissionsClosed` during the blackout and
/// `DomainError::RateLimited` when the actor cooldown is active.
pub async fn start_intake(
    actor_id: ActorId,
    display_name: &str,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
    actors: &dyn ActorRepository,
) -> Result<IntakeSession, DomainError> {
    let now = clock.now();
    if !cycle::submissions_open(now) {
        return Err(DomainError::SubmissionsClosed);
    }
    rate_limit::check_actor(actor_id, clock, submissions).await?;
    actors.upsert(actor_id, display_name, now).await?;
    tracing::debug!(%actor_id, "intake started");
    Ok(IntakeSession::new(actor_id, display_name.to_owned()))
}

/// Feeds one input into the state machine, mutating the session.
///
/// # Errors
///
/// Passes through store errors. Expected denials (validation, cooldown) are
/// outcomes, not errors.
pub async fn handle_input(
    session: &mut IntakeSession,
    input: IntakeInput<'_>,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<IntakeOutcome, DomainError> {
    match input {
        IntakeInput::Cancel => Ok(IntakeOutcome::Cancelled),
        IntakeInput::Back => Ok(step_back(session)),
        IntakeInput::ChooseCategory(category) => {
            if session.step != IntakeStep::ChooseType {
                return Ok(unexpected(session.step));
            }
            session.category = Some(category);
            session.step = IntakeStep::Wallet;
            Ok(IntakeOutcome::Prompt(IntakeStep::Wallet))
        }
        IntakeInput::Text(text) => handle_text(session, text.trim(), clock, submissions).await,
        IntakeInput::ConfirmSubmit => {
            if session.step != IntakeStep::Confirm {
                return Ok(unexpected(session.step));
            }
            submit(session, clock, submissions).await
        }
        IntakeInput::ConfirmCancel => {
            if session.step != IntakeStep::Confirm {
                return Ok(unexpected(session.step));
            }
            Ok(IntakeOutcome::Cancelled)
        }
        IntakeInput::EditStory => {
            if session.step != IntakeStep::Confirm {
                return Ok(unexpected(session.step));
            }
            // Collected fields stay put; the next story input overwrites.
            session.step = IntakeStep::Story;
            Ok(IntakeOutcome::Prompt(IntakeStep::Story))
        }
    }
}

fn unexpected(step: IntakeStep) -> IntakeOutcome {
    IntakeOutcome::Invalid {
        step,
        message: "Unexpected action for this step.".to_owned(),
    }
}

/// Back discards exactly the preceding state's collected value; at the first
/// state it re-prompts without effect.
fn step_back(session: &mut IntakeSession) -> IntakeOutcome {
    let target = match session.step {
        IntakeStep::ChooseType => IntakeStep::ChooseType,
        IntakeStep::Wallet => {
            session.category = None;
            IntakeStep::ChooseType
        }
        IntakeStep::Contract => {
            session.wallet = None;
            IntakeStep::Wallet
        }
        IntakeStep::Amount => {
            session.contract = None;
            IntakeStep::Contract
        }
        IntakeStep::Story => {
            session.amount = None;
            IntakeStep::Amount
        }
        IntakeStep::Confirm => {
            session.story = None;
            IntakeStep::Story
        }
    };
    session.step = target;
    IntakeOutcome::Prompt(target)
}

async fn handle_text(
    session: &mut IntakeSession,
    text: &str,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<IntakeOutcome, DomainError> {
    match session.step {
        IntakeStep::ChooseType | IntakeStep::Confirm => Ok(unexpected(session.step)),
        IntakeStep::Wallet => {
            if let Err(message) = validate::validate_wallet(text) {
                return Ok(IntakeOutcome::Invalid {
                    step: IntakeStep::Wallet,
                    message,
                });
            }
            // Fail fast: the wallet cooldown is checked here, not at submit.
            match rate_limit::check_wallet(text, clock, submissions).await {
                Ok(()) => {}
                Err(DomainError::RateLimited { scope }) => {
                    return Ok(IntakeOutcome::RateLimited(scope));
                }
                Err(other) => return Err(other),
            }
            session.wallet = Some(text.to_owned());
            session.step = IntakeStep::Contract;
            Ok(IntakeOutcome::Prompt(IntakeStep::Contract))
        }
        IntakeStep::Contract => {
            if let Err(message) = validate::validate_contract(text) {
                return Ok(IntakeOutcome::Invalid {
                    step: IntakeStep::Contract,
                    message,
                });
            }
            session.contract = Some(text.to_owned());
            session.step = IntakeStep::Amount;
            Ok(IntakeOutcome::Prompt(IntakeStep::Amount))
        }
        IntakeStep::Amount => {
            if let Err(message) = validate::validate_amount(text) {
                return Ok(IntakeOutcome::Invalid {
                    step: IntakeStep::Amount,
                    message,
                });
            }
            session.amount = Some(text.to_owned());
            session.step = IntakeStep::Story;
            Ok(IntakeOutcome::Prompt(IntakeStep::Story))
        }
        IntakeStep::Story => {
            if let Err(message) = validate::validate_story(text) {
                return Ok(IntakeOutcome::Invalid {
                    step: IntakeStep::Story,
                    message,
                });
            }
            session.story = Some(text.to_owned());
            session.step = IntakeStep::Confirm;
            Ok(IntakeOutcome::Prompt(IntakeStep::Confirm))
        }
    }
}

async fn submit(
    session: &mut IntakeSession,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<IntakeOutcome, DomainError> {
    let (Some(category), Some(wallet), Some(contract), Some(amount), Some(story)) = (
        session.category,
        session.wallet.clone(),
        session.contract.clone(),
        session.amount.clone(),
        session.story.clone(),
    ) else {
        return Ok(unexpected(session.step));
    };

    let now = clock.now();
    let submission = Submission {
        id: Uuid::new_v4(),
        actor_id: session.actor_id,
        display_name: session.display_name.clone(),
        category,
        wallet,
        contract,
        amount,
        story,
        status: SubmissionStatus::Pending,
        rejection_reason: None,
        scores: ScoreBreakdown::default(),
        total_points: 0,
        // The cycle is stamped at write time and never recomputed.
        cycle: CycleId::of(now),
        created_at: now,
        reviewed_at: None,
    };
    submissions.insert(submission.clone()).await?;
    tracing::info!(submission_id = %submission.id, actor_id = %session.actor_id, "submission created");
    Ok(IntakeOutcome::Submitted(submission))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use moondust_store::MemoryStore;
    use moondust_test_support::FixedClock;

    use super::*;

    fn open_thursday() -> FixedClock {
        // 2026-01-15 is a Thursday: submissions open.
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    async fn session_for(store: &MemoryStore, clock: &FixedClock, actor: i64) -> IntakeSession {
        start_intake(ActorId(actor), "tester", clock, store, store)
            .await
            .unwrap()
    }

    async fn walk_to_story(
        session: &mut IntakeSession,
        clock: &FixedClock,
        store: &MemoryStore,
        wallet: &str,
    ) {
        handle_input(
            session,
            IntakeInput::ChooseCategory(StoryCategory::Rekt),
            clock,
            store,
        )
        .await
        .unwrap();
        handle_input(session, IntakeInput::Text(wallet), clock, store)
            .await
            .unwrap();
        handle_input(session, IntakeInput::Text(&"C".repeat(30)), clock, store)
            .await
            .unwrap();
        handle_input(session, IntakeInput::Text("$5000"), clock, store)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_start_refused_during_saturday_blackout() {
        // Arrange: 2026-01-17 is a Saturday.
        let store = MemoryStore::new();
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 17, 12, 0, 0).unwrap());

        // Act
        let result = start_intake(ActorId(1), "tester", &clock, &store, &store).await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            DomainError::SubmissionsClosed
        ));
    }

    #[tokio::test]
    async fn test_happy_path_writes_pending_submission_stamped_with_cycle() {
        // Arrange
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        walk_to_story(&mut session, &clock, &store, &"W".repeat(30)).await;

        // Act
        let story = "thirty characters of pure pain";
        let to_confirm = handle_input(&mut session, IntakeInput::Text(story), &clock, &store)
            .await
            .unwrap();
        let submitted = handle_input(&mut session, IntakeInput::ConfirmSubmit, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert!(matches!(to_confirm, IntakeOutcome::Prompt(IntakeStep::Confirm)));
        let IntakeOutcome::Submitted(submission) = submitted else {
            panic!("expected Submitted, got {submitted:?}");
        };
        let persisted = SubmissionRepository::get(&store, submission.id)
            .await
            .unwrap();
        assert!(persisted.is_some());
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.cycle, CycleId::of(clock.0));
        assert_eq!(submission.story, story);
        assert_eq!(submission.total_points, 0);
    }

    #[tokio::test]
    async fn test_story_out_of_bounds_reprompts_with_offending_length() {
        // Arrange
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        walk_to_story(&mut session, &clock, &store, &"W".repeat(30)).await;

        // Act: 19 chars: too short, same step, not terminal.
        let outcome = handle_input(
            &mut session,
            IntakeInput::Text(&"x".repeat(19)),
            &clock,
            &store,
        )
        .await
        .unwrap();

        // Assert
        let IntakeOutcome::Invalid { step, message } = outcome else {
            panic!("expected Invalid, got {outcome:?}");
        };
        assert_eq!(step, IntakeStep::Story);
        assert!(message.contains("19"));
        assert_eq!(session.step, IntakeStep::Story);

        // A valid retry still advances.
        let retry = handle_input(
            &mut session,
            IntakeInput::Text(&"x".repeat(30)),
            &clock,
            &store,
        )
        .await
        .unwrap();
        assert!(matches!(retry, IntakeOutcome::Prompt(IntakeStep::Confirm)));
    }

    #[tokio::test]
    async fn test_wallet_cooldown_terminates_the_workflow_at_the_wallet_step() {
        // Arrange: actor 1 already submitted with this wallet an hour ago.
        let store = MemoryStore::new();
        let clock = open_thursday();
        let wallet = "SharedWallet12345678901234567890".to_owned();
        let mut first = session_for(&store, &clock, 1).await;
        walk_to_story(&mut first, &clock, &store, &wallet).await;
        handle_input(
            &mut first,
            IntakeInput::Text(&"y".repeat(30)),
            &clock,
            &store,
        )
        .await
        .unwrap();
        handle_input(&mut first, IntakeInput::ConfirmSubmit, &clock, &store)
            .await
            .unwrap();

        let later = FixedClock(clock.0 + chrono::Duration::hours(1));
        let mut second = session_for(&store, &later, 2).await;
        handle_input(
            &mut second,
            IntakeInput::ChooseCategory(StoryCategory::Moon),
            &later,
            &store,
        )
        .await
        .unwrap();

        // Act
        let outcome = handle_input(
            &mut second,
            IntakeInput::Text(&wallet.to_uppercase()),
            &later,
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert!(matches!(
            outcome,
            IntakeOutcome::RateLimited(RateLimitScope::Wallet)
        ));
        assert!(outcome.is_terminal());
    }

    #[tokio::test]
    async fn test_back_discards_only_the_preceding_value() {
        // Arrange: at the Contract step, wallet collected.
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        handle_input(
            &mut session,
            IntakeInput::ChooseCategory(StoryCategory::Rekt),
            &clock,
            &store,
        )
        .await
        .unwrap();
        handle_input(
            &mut session,
            IntakeInput::Text(&"W".repeat(30)),
            &clock,
            &store,
        )
        .await
        .unwrap();
        assert_eq!(session.step, IntakeStep::Contract);

        // Act
        let outcome = handle_input(&mut session, IntakeInput::Back, &clock, &store)
            .await
            .unwrap();

        // Assert: wallet discarded, category kept.
        assert!(matches!(outcome, IntakeOutcome::Prompt(IntakeStep::Wallet)));
        assert!(session.wallet.is_none());
        assert_eq!(session.category, Some(StoryCategory::Rekt));
    }

    #[tokio::test]
    async fn test_back_at_first_state_is_a_noop_reprompt() {
        // Arrange
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;

        // Act
        let outcome = handle_input(&mut session, IntakeInput::Back, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert!(matches!(
            outcome,
            IntakeOutcome::Prompt(IntakeStep::ChooseType)
        ));
        assert_eq!(session.step, IntakeStep::ChooseType);
    }

    #[tokio::test]
    async fn test_edit_story_returns_to_story_keeping_collected_fields() {
        // Arrange: at Confirm.
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        walk_to_story(&mut session, &clock, &store, &"W".repeat(30)).await;
        handle_input(
            &mut session,
            IntakeInput::Text(&"z".repeat(30)),
            &clock,
            &store,
        )
        .await
        .unwrap();

        // Act
        let outcome = handle_input(&mut session, IntakeInput::EditStory, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert!(matches!(outcome, IntakeOutcome::Prompt(IntakeStep::Story)));
        assert!(session.wallet.is_some());
        assert!(session.amount.is_some());
        assert!(session.story.is_some());
    }

    #[tokio::test]
    async fn test_cancel_is_accepted_from_any_state() {
        // Arrange
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        walk_to_story(&mut session, &clock, &store, &"W".repeat(30)).await;

        // Act
        let outcome = handle_input(&mut session, IntakeInput::Cancel, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert!(matches!(outcome, IntakeOutcome::Cancelled));
        assert!(outcome.is_terminal());
    }

    #[tokio::test]
    async fn test_start_refused_when_actor_cooldown_active() {
        // Arrange: actor 1 submits, then tries to start again an hour later.
        let store = MemoryStore::new();
        let clock = open_thursday();
        let mut session = session_for(&store, &clock, 1).await;
        walk_to_story(&mut session, &clock, &store, &"W".repeat(30)).await;
        handle_input(
            &mut session,
            IntakeInput::Text(&"s".repeat(30)),
            &clock,
            &store,
        )
        .await
        .unwrap();
        handle_input(&mut session, IntakeInput::ConfirmSubmit, &clock, &store)
            .await
            .unwrap();

        let later = FixedClock(clock.0 + chrono::Duration::hours(1));

        // Act
        let result = start_intake(ActorId(1), "tester", &later, &store, &store).await;

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            DomainError::RateLimited {
                scope: RateLimitScope::Actor
            }
        ));
    }
}
