//! Champion selection: once per cycle, highest approved total wins.

use moondust_core::clock::Clock;
use moondust_core::cycle::CycleId;
use moondust_core::error::DomainError;
use moondust_core::model::{ActorId, Champion, ModeratorId, story_preview};
use moondust_core::repository::{ChampionRepository, SubmissionRepository};

/// Selects the champion of the current cycle: the approved submission with
/// the highest total, ties broken by earliest creation timestamp. Does not
/// credit any points; those were credited at approval time.
///
/// # Errors
///
/// Returns `DomainError::Unauthorized` for a non-moderator,
/// `DomainError::NoEligibleWinner` when the cycle has no approved
/// submission, and `DomainError::ChampionAlreadySelected` when the cycle
/// already has a champion (the existing record is never overwritten).
pub async fn select_champion(
    acting: ActorId,
    moderator: ModeratorId,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
    champions: &dyn ChampionRepository,
) -> Result<Champion, DomainError> {
    moderator.authorize(acting)?;
    let now = clock.now();
    let current = CycleId::of(now);

    let winner = submissions
        .top_approved_in_cycle(current)
        .await?
        .ok_or(DomainError::NoEligibleWinner(current))?;

    let champion = Champion {
        cycle: current,
        actor_id: winner.actor_id,
        display_name: winner.display_name.clone(),
        submission_id: winner.id,
        story_preview: story_preview(&winner.story),
        total_points: winner.total_points,
        announced_at: now,
    };
    champions.insert_new(champion.clone()).await?;
    tracing::info!(
        cycle = %current,
        actor_id = %champion.actor_id,
        total = champion.total_points,
        "champion selected"
    );
    Ok(champion)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use moondust_core::model::{
        ScoreBreakdown, StoryCategory, Submission, SubmissionStatus,
    };
    use moondust_store::MemoryStore;
    use moondust_test_support::FixedClock;
    use uuid::Uuid;

    use super::*;

    const MODERATOR: ModeratorId = ModeratorId(ActorId(99));

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    async fn seed_approved(
        store: &MemoryStore,
        actor: i64,
        created_at: DateTime<Utc>,
        scores: ScoreBreakdown,
        story: &str,
    ) -> Uuid {
        let submission = Submission {
            id: Uuid::new_v4(),
            actor_id: ActorId(actor),
            display_name: format!("actor-{actor}"),
            category: StoryCategory::Moon,
            wallet: "W".repeat(30),
            contract: "C".repeat(30),
            amount: "10x".to_owned(),
            story: story.to_owned(),
            status: SubmissionStatus::Pending,
            rejection_reason: None,
            scores: ScoreBreakdown::default(),
            total_points: 0,
            cycle: CycleId::of(created_at),
            created_at,
            reviewed_at: None,
        };
        let id = submission.id;
        store.insert(submission).await.unwrap();
        store
            .approve_if_pending(id, scores, created_at + Duration::hours(1))
            .await
            .unwrap();
        id
    }

    fn scores(each: u32) -> ScoreBreakdown {
        ScoreBreakdown {
            authenticity: each,
            emotional: each,
            lesson: each,
            detail: each,
            storytelling: each,
        }
    }

    #[tokio::test]
    async fn test_highest_total_of_the_cycle_wins() {
        // Arrange
        let store = MemoryStore::new();
        let now = clock().0;
        seed_approved(&store, 1, now, scores(200), "a modest story about losses").await;
        let best = seed_approved(&store, 2, now, scores(1000), "the best story of the week").await;

        // Act
        let champion = select_champion(MODERATOR.0, MODERATOR, &clock(), &store, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(champion.submission_id, best);
        assert_eq!(champion.actor_id, ActorId(2));
        assert_eq!(champion.total_points, 5000);
    }

    #[tokio::test]
    async fn test_second_selection_in_same_cycle_fails_and_keeps_first_record() {
        // Arrange
        let store = MemoryStore::new();
        let now = clock().0;
        seed_approved(&store, 1, now, scores(800), "a winning story this cycle").await;
        let first = select_champion(MODERATOR.0, MODERATOR, &clock(), &store, &store)
            .await
            .unwrap();

        // Act
        let second = select_champion(MODERATOR.0, MODERATOR, &clock(), &store, &store).await;

        // Assert
        assert!(matches!(
            second.unwrap_err(),
            DomainError::ChampionAlreadySelected(c) if c == first.cycle
        ));
        assert_eq!(ChampionRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_approved_submission_means_no_eligible_winner() {
        let store = MemoryStore::new();
        let result = select_champion(MODERATOR.0, MODERATOR, &clock(), &store, &store).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::NoEligibleWinner(_)
        ));
    }

    #[tokio::test]
    async fn test_story_preview_is_bounded() {
        // Arrange
        let store = MemoryStore::new();
        let now = clock().0;
        let long_story = "s".repeat(700);
        seed_approved(&store, 1, now, scores(600), &long_story).await;

        // Act
        let champion = select_champion(MODERATOR.0, MODERATOR, &clock(), &store, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(champion.story_preview.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_selection_is_moderator_only() {
        let store = MemoryStore::new();
        let result = select_champion(ActorId(1), MODERATOR, &clock(), &store, &store).await;
        assert!(matches!(result.unwrap_err(), DomainError::Unauthorized));
    }
}
