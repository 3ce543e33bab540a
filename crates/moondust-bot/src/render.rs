//! Message rendering: turns workflow outcomes and views into `Outbound`
//! messages with their button payloads.
//!
//! All user-facing copy lives here so the dispatcher stays free of strings.
//! Buttons are always produced through [`Action::encode`] so the payload
//! grammar has a single definition.

use std::fmt::Write as _;

use moondust_core::error::{DomainError, RateLimitScope};
use moondust_core::model::{
    ALLOWED_MAGNITUDES, Champion, Criterion, RejectionReason, ScoreBreakdown, StoryCategory,
    Submission,
};
use moondust_core::notify::Outbound;
use moondust_intake::{IntakeSession, IntakeStep};
use moondust_leaderboard::{
    CycleStatusView, FullStatsView, LeaderboardView, ModerationStatusView, PersonalStats,
};
use moondust_review::{ScoringSession, ScoringStep};
use uuid::Uuid;

use crate::actions::{Action, ConfirmChoice, ReviewChoice, ScoringAction};

/// How many characters of the story appear on the confirmation summary.
const SUMMARY_STORY_CHARS: usize = 150;

/// Identifiers longer than this are shortened for display.
const SHORTEN_THRESHOLD: usize = 14;

fn shorten(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= SHORTEN_THRESHOLD {
        return value.to_owned();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}

/// The prompt for an intake step.
#[must_use]
pub fn intake_prompt(session: &IntakeSession, step: IntakeStep) -> Outbound {
    match step {
        IntakeStep::ChooseType => Outbound::with_buttons(
            "What kind of story are you submitting?\n\
             REKT — a loss story. MOON — a win story.",
            vec![
                Action::Category(StoryCategory::Rekt).encode(),
                Action::Category(StoryCategory::Moon).encode(),
            ],
        ),
        IntakeStep::Wallet => Outbound::text(
            "Send the wallet address the story happened on.\n\
             Type /back to go back or /cancel to stop.",
        ),
        IntakeStep::Contract => Outbound::text("Send the token contract address."),
        IntakeStep::Amount => {
            Outbound::text("How much was gained or lost? Any format works, e.g. $5000 or 2.5 SOL.")
        }
        IntakeStep::Story => Outbound::text(
            "Tell your story in your own words (20 to 750 characters).",
        ),
        IntakeStep::Confirm => confirm_summary(session),
    }
}

fn confirm_summary(session: &IntakeSession) -> Outbound {
    let category = session.category.map_or("?", StoryCategory::label);
    let wallet = session.wallet.as_deref().map_or_else(String::new, shorten);
    let contract = session.contract.as_deref().map_or_else(String::new, shorten);
    let amount = session.amount.as_deref().unwrap_or_default();
    let story: String = session
        .story
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(SUMMARY_STORY_CHARS)
        .collect();
    let text = format!(
        "Here's your submission:\n\n\
         Type: {category}\n\
         Wallet: {wallet}\n\
         Contract: {contract}\n\
         Amount: {amount}\n\
         Story: {story}\n\n\
         Submit it?"
    );
    Outbound::with_buttons(
        text,
        vec![
            Action::Confirm(ConfirmChoice::Submit).encode(),
            Action::Confirm(ConfirmChoice::EditStory).encode(),
            Action::Confirm(ConfirmChoice::Cancel).encode(),
        ],
    )
}

/// Re-prompt after a failed validation: the reason, then the step again.
#[must_use]
pub fn invalid_reprompt(session: &IntakeSession, step: IntakeStep, message: &str) -> Vec<Outbound> {
    vec![Outbound::text(message), intake_prompt(session, step)]
}

/// Acknowledgement sent to the actor right after their submission is stored.
#[must_use]
pub fn submission_received(submission: &Submission) -> Outbound {
    Outbound::text(format!(
        "Your {} story is in! It will be reviewed soon. Submission id: {}",
        submission.category.label(),
        submission.id
    ))
}

/// Cancellation acknowledgement.
#[must_use]
pub fn cancelled() -> Outbound {
    Outbound::text("Submission cancelled. Send /start when you're ready to try again.")
}

/// The moderator's notification for a freshly stored submission: the full
/// content plus the decision buttons.
#[must_use]
pub fn moderator_notification(submission: &Submission) -> Outbound {
    let text = format!(
        "New {} submission from {} (id {})\n\n\
         Wallet: {}\n\
         Contract: {}\n\
         Amount: {}\n\n\
         {}",
        submission.category.label(),
        submission.display_name,
        submission.actor_id,
        submission.wallet,
        submission.contract,
        submission.amount,
        submission.story
    );
    Outbound::with_buttons(text, review_buttons(submission.id))
}

fn review_buttons(id: Uuid) -> Vec<String> {
    vec![
        Action::Review {
            choice: ReviewChoice::Approve,
            submission_id: id,
        }
        .encode(),
        Action::Review {
            choice: ReviewChoice::Reject,
            submission_id: id,
        }
        .encode(),
        Action::Review {
            choice: ReviewChoice::Skip,
            submission_id: id,
        }
        .encode(),
    ]
}

/// One row of the moderator's pending queue.
#[must_use]
pub fn pending_entry(submission: &Submission) -> Outbound {
    let story: String = submission.story.chars().take(SUMMARY_STORY_CHARS).collect();
    let text = format!(
        "[{}] {} — {} ({})\n{}",
        submission.category.label(),
        submission.display_name,
        submission.amount,
        submission.created_at.format("%Y-%m-%d %H:%M UTC"),
        story
    );
    Outbound::with_buttons(text, review_buttons(submission.id))
}

/// The rejection-reason picker for one submission.
#[must_use]
pub fn rejection_reasons(id: Uuid) -> Outbound {
    let mut buttons: Vec<String> = RejectionReason::ALL
        .into_iter()
        .map(|reason| {
            Action::RejectReason {
                reason,
                submission_id: id,
            }
            .encode()
        })
        .collect();
    buttons.push(
        Action::Review {
            choice: ReviewChoice::Back,
            submission_id: id,
        }
        .encode(),
    );
    Outbound::with_buttons("Why is this submission rejected?", buttons)
}

/// The prompt for the current scoring step.
#[must_use]
pub fn scoring_prompt(session: &ScoringSession) -> Outbound {
    match session.step() {
        ScoringStep::Criterion(criterion) => criterion_prompt(criterion),
        ScoringStep::Summary { breakdown, total } => scoring_summary(breakdown, total),
    }
}

fn criterion_prompt(criterion: Criterion) -> Outbound {
    let mut buttons: Vec<String> = ALLOWED_MAGNITUDES
        .into_iter()
        .map(|value| Action::Scoring(ScoringAction::Select { criterion, value }).encode())
        .collect();
    buttons.push(Action::Scoring(ScoringAction::Back).encode());
    buttons.push(Action::Scoring(ScoringAction::Cancel).encode());
    Outbound::with_buttons(format!("Score: {}", criterion.label()), buttons)
}

fn scoring_summary(breakdown: ScoreBreakdown, total: u32) -> Outbound {
    let mut text = String::from("Scores:\n");
    for criterion in Criterion::ALL {
        let _ = writeln!(text, "{}: {}", criterion.label(), breakdown.get(criterion));
    }
    let _ = write!(text, "\nTotal: {total} points. Confirm approval?");
    Outbound::with_buttons(
        text,
        vec![
            Action::Scoring(ScoringAction::Confirm).encode(),
            Action::Scoring(ScoringAction::Redo).encode(),
            Action::Scoring(ScoringAction::Cancel).encode(),
        ],
    )
}

/// Tells the actor their submission was approved and how many points landed.
#[must_use]
pub fn approval_notice(submission: &Submission) -> Outbound {
    Outbound::text(format!(
        "Your {} story was approved! You earned {} points.",
        submission.category.label(),
        submission.total_points
    ))
}

/// Tells the actor their submission was rejected and why.
#[must_use]
pub fn rejection_notice(submission: &Submission) -> Outbound {
    let reason = submission
        .rejection_reason
        .map_or("Not specified", RejectionReason::label);
    Outbound::text(format!(
        "Your {} story was not approved.\nReason: {reason}\n\
         You can submit a new story tomorrow.",
        submission.category.label()
    ))
}

/// The personal stats view.
#[must_use]
pub fn personal_stats(stats: &PersonalStats) -> Outbound {
    Outbound::text(format!(
        "{} — your stats\n\n\
         Points: {}\n\
         Rank: #{}\n\
         Championships: {}\n\
         Submissions: {} total ({} approved, {} pending, {} rejected)",
        stats.display_name,
        stats.total_points,
        stats.rank,
        stats.championship_wins,
        stats.submissions.total,
        stats.submissions.approved,
        stats.submissions.pending,
        stats.submissions.rejected
    ))
}

/// The top-10 leaderboard plus the viewer's own line.
#[must_use]
pub fn leaderboard(view: &LeaderboardView) -> Outbound {
    let mut text = String::from("Leaderboard\n\n");
    if view.entries.is_empty() {
        text.push_str("No points awarded yet.\n");
    }
    for (index, actor) in view.entries.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {} — {} pts",
            index + 1,
            actor.display_name,
            actor.total_points
        );
    }
    let _ = write!(
        text,
        "\nYou: #{} with {} pts",
        view.viewer_rank, view.viewer_points
    );
    Outbound::text(text)
}

/// Champion history, newest first.
#[must_use]
pub fn champions(history: &[Champion]) -> Outbound {
    if history.is_empty() {
        return Outbound::text("No champions yet. The first cycle is still running.");
    }
    let mut text = String::from("Hall of champions\n\n");
    for champion in history {
        let _ = writeln!(
            text,
            "{} — {} ({} pts)\n\"{}\"",
            champion.cycle, champion.display_name, champion.total_points, champion.story_preview
        );
    }
    Outbound::text(text)
}

/// The public current-cycle view.
#[must_use]
pub fn cycle_status(view: &CycleStatusView) -> Outbound {
    let state = if view.open {
        format!("open — closes in {}h", view.closes_in_hours)
    } else {
        "closed for review day".to_owned()
    };
    Outbound::text(format!(
        "Cycle {}\nSubmissions: {state}\nStories this cycle: {}",
        view.cycle, view.submissions_this_cycle
    ))
}

/// The moderator's queue-and-cycle view.
#[must_use]
pub fn moderation_status(view: &ModerationStatusView) -> Outbound {
    Outbound::text(format!(
        "Cycle {} ({})\n\
         Pending reviews: {}\n\
         This cycle: {} submitted, {} approved",
        view.cycle,
        if view.open { "open" } else { "closed" },
        view.pending,
        view.this_cycle,
        view.approved_this_cycle
    ))
}

/// The moderator's whole-system totals.
#[must_use]
pub fn full_stats(view: &FullStatsView) -> Outbound {
    Outbound::text(format!(
        "Totals\n\n\
         Users: {}\n\
         Submissions: {}\n\
         Points awarded: {}\n\
         Championships: {}",
        view.total_actors, view.total_submissions, view.total_points_awarded, view.championships_held
    ))
}

/// The champion announcement sent to the winner.
#[must_use]
pub fn champion_announcement(champion: &Champion) -> Outbound {
    Outbound::text(format!(
        "Congratulations! Your story won cycle {} with {} points. \
         You are this week's champion!",
        champion.cycle, champion.total_points
    ))
}

/// The moderator's confirmation after selecting a champion.
#[must_use]
pub fn champion_selected(champion: &Champion) -> Outbound {
    Outbound::text(format!(
        "Champion of {}: {} with {} points.\n\"{}\"",
        champion.cycle, champion.display_name, champion.total_points, champion.story_preview
    ))
}

/// Friendly reply for an expected domain refusal. Infrastructure errors are
/// not rendered here; they propagate to the caller.
#[must_use]
pub fn error_reply(error: &DomainError) -> Outbound {
    match error {
        DomainError::SubmissionsClosed => Outbound::text(
            "Submissions are closed today while the week's stories are reviewed. \
             Come back tomorrow!",
        ),
        DomainError::RateLimited { scope } => Outbound::text(match scope {
            RateLimitScope::Actor => {
                "You already submitted a story in the last 24 hours. Try again later."
            }
            RateLimitScope::Wallet => {
                "This wallet already has a submission in the last 24 hours. Try again later."
            }
        }),
        DomainError::Unauthorized => Outbound::text("Not authorized."),
        DomainError::SubmissionNotFound(_) => Outbound::text("That submission no longer exists."),
        DomainError::ActorNotFound(_) => Outbound::text("Unknown user."),
        DomainError::StatusConflict { actual, .. } => Outbound::text(format!(
            "That submission was already decided (now {actual})."
        )),
        DomainError::NoEligibleWinner(cycle) => Outbound::text(format!(
            "No approved submissions in cycle {cycle}; no champion to select."
        )),
        DomainError::ChampionAlreadySelected(cycle) => Outbound::text(format!(
            "Cycle {cycle} already has a champion."
        )),
        DomainError::Validation(message) => Outbound::text(message.clone()),
        DomainError::Infrastructure(_) => {
            Outbound::text("Something went wrong. Please try again.")
        }
    }
}

/// Greeting for actors with no active workflow who send plain text.
#[must_use]
pub fn idle_hint() -> Outbound {
    Outbound::text("Send /start to submit a story, or /leaderboard to see the standings.")
}
