//! Domain records: actors, submissions, champions, and the scoring model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cycle::CycleId;
use crate::error::DomainError;

/// Opaque, transport-assigned identity of an end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub i64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single privileged identity allowed to moderate.
///
/// Authorization is always re-checked server-side against this value; it is
/// never trusted from an action payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeratorId(pub ActorId);

impl ModeratorId {
    /// Checks that `acting` is the configured moderator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for any other identity. The error
    /// carries no detail about why.
    pub fn authorize(&self, acting: ActorId) -> Result<(), DomainError> {
        if acting == self.0 {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }
}

/// The two story categories an actor can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryCategory {
    /// A loss story.
    Rekt,
    /// A win story.
    Moon,
}

impl StoryCategory {
    /// Stable key used in action payloads and persisted records.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Rekt => "rekt",
            Self::Moon => "moon",
        }
    }

    /// Parses a payload key back into a category.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "rekt" => Some(Self::Rekt),
            "moon" => Some(Self::Moon),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rekt => "REKT",
            Self::Moon => "MOON",
        }
    }
}

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Awaiting a moderation decision.
    Pending,
    /// Scored and credited.
    Approved,
    /// Rejected with a coded reason.
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Closed set of rejection-reason codes shown to the moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The story reads as machine-generated.
    AiGenerated,
    /// The story cannot be verified.
    Fake,
    /// The story was copied from someone else.
    Copied,
    /// The wallet or contract does not check out.
    InvalidAddress,
    /// The same story was already submitted.
    Duplicate,
    /// Not enough effort to review.
    LowEffort,
    /// Content unfit for the community.
    Inappropriate,
    /// Multiple-account abuse.
    MultiAccount,
}

impl RejectionReason {
    /// All reasons, in the order they are offered to the moderator.
    pub const ALL: [Self; 8] = [
        Self::AiGenerated,
        Self::Fake,
        Self::Copied,
        Self::InvalidAddress,
        Self::Duplicate,
        Self::LowEffort,
        Self::Inappropriate,
        Self::MultiAccount,
    ];

    /// Compact code used in action payloads.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::AiGenerated => "ai",
            Self::Fake => "fake",
            Self::Copied => "copied",
            Self::InvalidAddress => "invalid",
            Self::Duplicate => "duplicate",
            Self::LowEffort => "loweffort",
            Self::Inappropriate => "inappropriate",
            Self::MultiAccount => "multiaccounts",
        }
    }

    /// Parses a payload code back into a reason.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    /// Human-readable label sent to the rejected actor.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AiGenerated => "AI-generated content",
            Self::Fake => "Fake or unverifiable story",
            Self::Copied => "Copied or stolen content",
            Self::InvalidAddress => "Invalid wallet or contract",
            Self::Duplicate => "Duplicate submission",
            Self::LowEffort => "Too low effort",
            Self::Inappropriate => "Inappropriate content",
            Self::MultiAccount => "Multiple account abuse",
        }
    }
}

/// The five scoring criteria, in the order the wizard walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Is the story authentic and verifiable.
    Authenticity,
    /// Emotional impact.
    Emotional,
    /// Lesson learned.
    Lesson,
    /// Detail quality.
    Detail,
    /// Storytelling quality.
    Storytelling,
}

impl Criterion {
    /// All criteria in wizard order.
    pub const ALL: [Self; 5] = [
        Self::Authenticity,
        Self::Emotional,
        Self::Lesson,
        Self::Detail,
        Self::Storytelling,
    ];

    /// Number of criteria.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable key used in action payloads.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Authenticity => "authenticity",
            Self::Emotional => "emotional",
            Self::Lesson => "lesson",
            Self::Detail => "detail",
            Self::Storytelling => "storytelling",
        }
    }

    /// Parses a payload key back into a criterion.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Authenticity => "Authenticity",
            Self::Emotional => "Emotional Impact",
            Self::Lesson => "Lesson Learned",
            Self::Detail => "Detail Quality",
            Self::Storytelling => "Storytelling",
        }
    }
}

/// The discrete magnitudes a criterion may be scored at.
pub const ALLOWED_MAGNITUDES: [u32; 5] = [200, 400, 600, 800, 1000];

/// Returns whether `value` is one of the allowed score magnitudes.
#[must_use]
pub fn is_allowed_magnitude(value: u32) -> bool {
    ALLOWED_MAGNITUDES.contains(&value)
}

/// One score per criterion. All zeros until a submission is approved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Authenticity score.
    pub authenticity: u32,
    /// Emotional impact score.
    pub emotional: u32,
    /// Lesson learned score.
    pub lesson: u32,
    /// Detail quality score.
    pub detail: u32,
    /// Storytelling score.
    pub storytelling: u32,
}

impl ScoreBreakdown {
    /// Returns the score recorded for one criterion.
    #[must_use]
    pub fn get(&self, criterion: Criterion) -> u32 {
        match criterion {
            Criterion::Authenticity => self.authenticity,
            Criterion::Emotional => self.emotional,
            Criterion::Lesson => self.lesson,
            Criterion::Detail => self.detail,
            Criterion::Storytelling => self.storytelling,
        }
    }

    /// Records the score for one criterion.
    pub fn set(&mut self, criterion: Criterion, value: u32) {
        match criterion {
            Criterion::Authenticity => self.authenticity = value,
            Criterion::Emotional => self.emotional = value,
            Criterion::Lesson => self.lesson = value,
            Criterion::Detail => self.detail = value,
            Criterion::Storytelling => self.storytelling = value,
        }
    }

    /// Unweighted sum of the five criterion scores.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.authenticity + self.emotional + self.lesson + self.detail + self.storytelling
    }
}

/// An end user of the intake workflow. Created on first interaction,
/// mutated only by point crediting and reversal, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Opaque identity.
    pub id: ActorId,
    /// Display name, refreshed on every interaction.
    pub display_name: String,
    /// Cumulative points over approved submissions, net of reversals.
    pub total_points: i64,
    /// First-interaction timestamp.
    pub joined_at: DateTime<Utc>,
}

/// A story submission. Never deleted; this is the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique submission identifier.
    pub id: Uuid,
    /// Submitting actor.
    pub actor_id: ActorId,
    /// Actor display name at submission time.
    pub display_name: String,
    /// Story category.
    pub category: StoryCategory,
    /// Wallet identifier.
    pub wallet: String,
    /// Contract identifier.
    pub contract: String,
    /// Free-text amount.
    pub amount: String,
    /// Free-text story body.
    pub story: String,
    /// Lifecycle status.
    pub status: SubmissionStatus,
    /// Set only when rejected.
    pub rejection_reason: Option<RejectionReason>,
    /// Per-criterion scores; all zeros until approved.
    pub scores: ScoreBreakdown,
    /// Derived sum of the breakdown; zero while pending.
    pub total_points: u32,
    /// The cycle active when the submission was created. Never recomputed.
    pub cycle: CycleId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Set when a terminal decision is written; cleared by reversal.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Maximum length of a champion's story preview, in characters.
pub const STORY_PREVIEW_CHARS: usize = 100;

/// Truncates a story body to the champion preview length.
#[must_use]
pub fn story_preview(story: &str) -> String {
    story.chars().take(STORY_PREVIEW_CHARS).collect()
}

/// The winning submission of one cycle. At most one per cycle; immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    /// The cycle this champion won. Unique.
    pub cycle: CycleId,
    /// Winning actor.
    pub actor_id: ActorId,
    /// Winning actor's display name at selection time.
    pub display_name: String,
    /// The winning submission.
    pub submission_id: Uuid,
    /// Bounded preview of the story text.
    pub story_preview: String,
    /// The winning point total.
    pub total_points: u32,
    /// Selection timestamp.
    pub announced_at: DateTime<Utc>,
}

/// Per-status submission counts for one actor.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    /// All submissions.
    pub total: u64,
    /// Still pending.
    pub pending: u64,
    /// Approved.
    pub approved: u64,
    /// Rejected.
    pub rejected: u64,
}
