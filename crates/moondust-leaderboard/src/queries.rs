//! Read-only views over actors, submissions, and champions.

use serde::Serialize;

use moondust_core::clock::Clock;
use moondust_core::cycle::{self, CycleId};
use moondust_core::error::DomainError;
use moondust_core::model::{
    Actor, ActorId, Champion, ModeratorId, StatusCounts, SubmissionStatus,
};
use moondust_core::repository::{ActorRepository, ChampionRepository, SubmissionRepository};

/// How many rows the leaderboard and champion history views return.
pub const VIEW_LIMIT: usize = 10;

/// Rank for a given point total: one plus the number of actors strictly
/// above it. Ties produce identical ranks.
///
/// # Errors
///
/// Passes through store errors.
pub async fn rank_for_points(
    points: i64,
    actors: &dyn ActorRepository,
) -> Result<u64, DomainError> {
    Ok(actors.count_with_points_above(points).await? + 1)
}

/// One actor's personal statistics.
#[derive(Debug, Serialize)]
pub struct PersonalStats {
    /// The actor.
    pub actor_id: ActorId,
    /// Display name on record.
    pub display_name: String,
    /// Cumulative point balance.
    pub total_points: i64,
    /// Leaderboard rank.
    pub rank: u64,
    /// Cycles won.
    pub championship_wins: u64,
    /// Submission counts by status.
    pub submissions: StatusCounts,
}

/// Builds the personal stats view for one actor. Unknown actors (who never
/// interacted before) rank with a zero balance.
///
/// # Errors
///
/// Passes through store errors.
pub async fn personal_stats(
    actor_id: ActorId,
    fallback_name: &str,
    actors: &dyn ActorRepository,
    submissions: &dyn SubmissionRepository,
    champions: &dyn ChampionRepository,
) -> Result<PersonalStats, DomainError> {
    let actor = actors.get(actor_id).await?;
    let (display_name, total_points) = match actor {
        Some(actor) => (actor.display_name, actor.total_points),
        None => (fallback_name.to_owned(), 0),
    };
    Ok(PersonalStats {
        actor_id,
        display_name,
        total_points,
        rank: rank_for_points(total_points, actors).await?,
        championship_wins: champions.wins_for_actor(actor_id).await?,
        submissions: submissions.status_counts_for_actor(actor_id).await?,
    })
}

/// The top-N leaderboard plus the viewer's own placement.
#[derive(Debug, Serialize)]
pub struct LeaderboardView {
    /// Top actors, ordered by total descending.
    pub entries: Vec<Actor>,
    /// The viewer's rank.
    pub viewer_rank: u64,
    /// The viewer's balance.
    pub viewer_points: i64,
}

/// Builds the leaderboard view for a viewer.
///
/// # Errors
///
/// Passes through store errors.
pub async fn leaderboard(
    viewer: ActorId,
    actors: &dyn ActorRepository,
) -> Result<LeaderboardView, DomainError> {
    let entries = actors.top_by_points(VIEW_LIMIT).await?;
    let viewer_points = actors.get(viewer).await?.map_or(0, |a| a.total_points);
    Ok(LeaderboardView {
        entries,
        viewer_rank: rank_for_points(viewer_points, actors).await?,
        viewer_points,
    })
}

/// Champion history, newest cycle first.
///
/// # Errors
///
/// Passes through store errors.
pub async fn champion_history(
    champions: &dyn ChampionRepository,
) -> Result<Vec<Champion>, DomainError> {
    champions.recent(VIEW_LIMIT).await
}

/// Public view of the current cycle.
#[derive(Debug, Serialize)]
pub struct CycleStatusView {
    /// The current cycle.
    pub cycle: CycleId,
    /// Whether intake is open right now.
    pub open: bool,
    /// Whole hours until the cutoff; zero during the blackout.
    pub closes_in_hours: i64,
    /// Submissions created this cycle.
    pub submissions_this_cycle: u64,
}

/// Builds the public cycle status view.
///
/// # Errors
///
/// Passes through store errors.
pub async fn cycle_status(
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<CycleStatusView, DomainError> {
    let now = clock.now();
    let current = CycleId::of(now);
    Ok(CycleStatusView {
        cycle: current,
        open: cycle::submissions_open(now),
        closes_in_hours: cycle::time_until_close(now).num_hours(),
        submissions_this_cycle: submissions.count_in_cycle(current).await?,
    })
}

/// Moderator view of the review queue and the current cycle.
#[derive(Debug, Serialize)]
pub struct ModerationStatusView {
    /// The current cycle.
    pub cycle: CycleId,
    /// Whether intake is open right now.
    pub open: bool,
    /// Pending submissions across all cycles.
    pub pending: u64,
    /// Submissions created this cycle.
    pub this_cycle: u64,
    /// Approved submissions this cycle.
    pub approved_this_cycle: u64,
}

/// Builds the moderator status view.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator.
pub async fn moderation_status(
    acting: ActorId,
    moderator: ModeratorId,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<ModerationStatusView, DomainError> {
    moderator.authorize(acting)?;
    let now = clock.now();
    let current = CycleId::of(now);
    Ok(ModerationStatusView {
        cycle: current,
        open: cycle::submissions_open(now),
        pending: submissions.count_by_status(SubmissionStatus::Pending).await?,
        this_cycle: submissions.count_in_cycle(current).await?,
        approved_this_cycle: submissions
            .count_in_cycle_with_status(current, SubmissionStatus::Approved)
            .await?,
    })
}

/// Whole-system statistics for the moderator.
#[derive(Debug, Serialize)]
pub struct FullStatsView {
    /// Actors ever seen.
    pub total_actors: u64,
    /// Submissions ever created.
    pub total_submissions: u64,
    /// Sum of all actor balances.
    pub total_points_awarded: i64,
    /// Champions crowned.
    pub championships_held: u64,
}

/// Builds the full statistics view.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator.
pub async fn full_stats(
    acting: ActorId,
    moderator: ModeratorId,
    actors: &dyn ActorRepository,
    submissions: &dyn SubmissionRepository,
    champions: &dyn ChampionRepository,
) -> Result<FullStatsView, DomainError> {
    moderator.authorize(acting)?;
    Ok(FullStatsView {
        total_actors: actors.count().await?,
        total_submissions: submissions.count().await?,
        total_points_awarded: actors.total_points_awarded().await?,
        championships_held: champions.count().await?,
    })
}
