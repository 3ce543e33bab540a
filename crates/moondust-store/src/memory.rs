//! In-memory store backing all three repository traits.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use moondust_core::cycle::CycleId;
use moondust_core::error::DomainError;
use moondust_core::model::{
    Actor, ActorId, Champion, RejectionReason, ScoreBreakdown, StatusCounts, Submission,
    SubmissionStatus,
};
use moondust_core::repository::{ActorRepository, ChampionRepository, SubmissionRepository};

#[derive(Debug, Default)]
struct Inner {
    actors: HashMap<ActorId, Actor>,
    submissions: HashMap<Uuid, Submission>,
    champions: Vec<Champion>,
}

/// Single-process store, shared behind an `Arc`. All access goes through
/// one mutex, so conditional updates are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Infrastructure("store mutex poisoned".into()))
    }
}

#[async_trait]
impl ActorRepository for MemoryStore {
    async fn upsert(
        &self,
        id: ActorId,
        display_name: &str,
        joined_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner
            .actors
            .entry(id)
            .and_modify(|actor| actor.display_name = display_name.to_owned())
            .or_insert_with(|| Actor {
                id,
                display_name: display_name.to_owned(),
                total_points: 0,
                joined_at,
            });
        Ok(())
    }

    async fn get(&self, id: ActorId) -> Result<Option<Actor>, DomainError> {
        Ok(self.lock()?.actors.get(&id).cloned())
    }

    async fn adjust_points(&self, id: ActorId, delta: i64) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        let actor = inner
            .actors
            .get_mut(&id)
            .ok_or(DomainError::ActorNotFound(id))?;
        actor.total_points += delta;
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.lock()?.actors.len() as u64)
    }

    async fn total_points_awarded(&self) -> Result<i64, DomainError> {
        Ok(self.lock()?.actors.values().map(|a| a.total_points).sum())
    }

    async fn count_with_points_above(&self, points: i64) -> Result<u64, DomainError> {
        Ok(self
            .lock()?
            .actors
            .values()
            .filter(|a| a.total_points > points)
            .count() as u64)
    }

    async fn top_by_points(&self, limit: usize) -> Result<Vec<Actor>, DomainError> {
        let mut actors: Vec<Actor> = self.lock()?.actors.values().cloned().collect();
        actors.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then(a.joined_at.cmp(&b.joined_at))
        });
        actors.truncate(limit);
        Ok(actors)
    }
}

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn insert(&self, submission: Submission) -> Result<(), DomainError> {
        self.lock()?.submissions.insert(submission.id, submission);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Submission>, DomainError> {
        Ok(self.lock()?.submissions.get(&id).cloned())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<Submission>, DomainError> {
        let mut pending: Vec<Submission> = self
            .lock()?
            .submissions
            .values()
            .filter(|s| s.status == SubmissionStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|s| s.created_at);
        pending.truncate(limit);
        Ok(pending)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.lock()?.submissions.len() as u64)
    }

    async fn count_by_status(&self, status: SubmissionStatus) -> Result<u64, DomainError> {
        Ok(self
            .lock()?
            .submissions
            .values()
            .filter(|s| s.status == status)
            .count() as u64)
    }

    async fn count_in_cycle(&self, cycle: CycleId) -> Result<u64, DomainError> {
        Ok(self
            .lock()?
            .submissions
            .values()
            .filter(|s| s.cycle == cycle)
            .count() as u64)
    }

    async fn count_in_cycle_with_status(
        &self,
        cycle: CycleId,
        status: SubmissionStatus,
    ) -> Result<u64, DomainError> {
        Ok(self
            .lock()?
            .submissions
            .values()
            .filter(|s| s.cycle == cycle && s.status == status)
            .count() as u64)
    }

    async fn status_counts_for_actor(&self, actor_id: ActorId) -> Result<StatusCounts, DomainError> {
        let inner = self.lock()?;
        let mut counts = StatusCounts::default();
        for submission in inner.submissions.values().filter(|s| s.actor_id == actor_id) {
            counts.total += 1;
            match submission.status {
                SubmissionStatus::Pending => counts.pending += 1,
                SubmissionStatus::Approved => counts.approved += 1,
                SubmissionStatus::Rejected => counts.rejected += 1,
            }
        }
        Ok(counts)
    }

    async fn exists_for_actor_since(
        &self,
        actor_id: ActorId,
        since: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        Ok(self
            .lock()?
            .submissions
            .values()
            .any(|s| s.actor_id == actor_id && s.created_at > since))
    }

    async fn exists_for_wallet_since(
        &self,
        wallet: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let needle = wallet.to_lowercase();
        Ok(self
            .lock()?
            .submissions
            .values()
            .any(|s| s.wallet.to_lowercase() == needle && s.created_at > since))
    }

    async fn approve_if_pending(
        &self,
        id: Uuid,
        scores: ScoreBreakdown,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError> {
        let mut inner = self.lock()?;
        let submission = inner
            .submissions
            .get_mut(&id)
            .ok_or(DomainError::SubmissionNotFound(id))?;
        if submission.status != SubmissionStatus::Pending {
            return Err(DomainError::StatusConflict {
                submission_id: id,
                expected: SubmissionStatus::Pending,
                actual: submission.status,
            });
        }
        submission.status = SubmissionStatus::Approved;
        submission.scores = scores;
        submission.total_points = scores.total();
        submission.reviewed_at = Some(reviewed_at);
        Ok(submission.clone())
    }

    async fn reject_if_pending(
        &self,
        id: Uuid,
        reason: RejectionReason,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Submission, DomainError> {
        let mut inner = self.lock()?;
        let submission = inner
            .submissions
            .get_mut(&id)
            .ok_or(DomainError::SubmissionNotFound(id))?;
        if submission.status != SubmissionStatus::Pending {
            return Err(DomainError::StatusConflict {
                submission_id: id,
                expected: SubmissionStatus::Pending,
                actual: submission.status,
            });
        }
        submission.status = SubmissionStatus::Rejected;
        submission.rejection_reason = Some(reason);
        submission.reviewed_at = Some(reviewed_at);
        Ok(submission.clone())
    }

    async fn reset_to_pending(&self, id: Uuid) -> Result<Submission, DomainError> {
        let mut inner = self.lock()?;
        let submission = inner
            .submissions
            .get_mut(&id)
            .ok_or(DomainError::SubmissionNotFound(id))?;
        let before = submission.clone();
        submission.status = SubmissionStatus::Pending;
        submission.rejection_reason = None;
        submission.scores = ScoreBreakdown::default();
        submission.total_points = 0;
        submission.reviewed_at = None;
        Ok(before)
    }

    async fn top_approved_in_cycle(
        &self,
        cycle: CycleId,
    ) -> Result<Option<Submission>, DomainError> {
        let inner = self.lock()?;
        let mut best: Option<&Submission> = None;
        for candidate in inner
            .submissions
            .values()
            .filter(|s| s.cycle == cycle && s.status == SubmissionStatus::Approved)
        {
            let beats = match best {
                None => true,
                Some(current) => {
                    candidate.total_points > current.total_points
                        || (candidate.total_points == current.total_points
                            && candidate.created_at < current.created_at)
                }
            };
            if beats {
                best = Some(candidate);
            }
        }
        Ok(best.cloned())
    }
}

#[async_trait]
impl ChampionRepository for MemoryStore {
    async fn insert_new(&self, champion: Champion) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        if inner.champions.iter().any(|c| c.cycle == champion.cycle) {
            return Err(DomainError::ChampionAlreadySelected(champion.cycle));
        }
        inner.champions.push(champion);
        Ok(())
    }

    async fn get_by_cycle(&self, cycle: CycleId) -> Result<Option<Champion>, DomainError> {
        Ok(self
            .lock()?
            .champions
            .iter()
            .find(|c| c.cycle == cycle)
            .cloned())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Champion>, DomainError> {
        let mut champions = self.lock()?.champions.clone();
        champions.sort_by(|a, b| b.cycle.cmp(&a.cycle));
        champions.truncate(limit);
        Ok(champions)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.lock()?.champions.len() as u64)
    }

    async fn wins_for_actor(&self, actor_id: ActorId) -> Result<u64, DomainError> {
        Ok(self
            .lock()?
            .champions
            .iter()
            .filter(|c| c.actor_id == actor_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use moondust_core::model::StoryCategory;

    use super::*;

    fn submission_at(created_at: DateTime<Utc>, actor: i64, wallet: &str) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            actor_id: ActorId(actor),
            display_name: format!("actor-{actor}"),
            category: StoryCategory::Rekt,
            wallet: wallet.to_owned(),
            contract: "C".repeat(30),
            amount: "$5000".to_owned(),
            story: "a story long enough to pass validation".to_owned(),
            status: SubmissionStatus::Pending,
            rejection_reason: None,
            scores: ScoreBreakdown::default(),
            total_points: 0,
            cycle: CycleId::of(created_at),
            created_at,
            reviewed_at: None,
        }
    }

    fn scores_totalling_4000() -> ScoreBreakdown {
        ScoreBreakdown {
            authenticity: 1000,
            emotional: 800,
            lesson: 600,
            detail: 600,
            storytelling: 1000,
        }
    }

    #[tokio::test]
    async fn test_approve_if_pending_writes_scores_total_and_review_time() {
        // Arrange
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let submission = submission_at(now, 1, &"W".repeat(30));
        let id = submission.id;
        store.insert(submission).await.unwrap();

        // Act
        let approved = store
            .approve_if_pending(id, scores_totalling_4000(), now)
            .await
            .unwrap();

        // Assert
        assert_eq!(approved.status, SubmissionStatus::Approved);
        assert_eq!(approved.total_points, 4000);
        assert_eq!(approved.reviewed_at, Some(now));
    }

    #[tokio::test]
    async fn test_second_decision_on_same_submission_is_a_conflict() {
        // Arrange
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let submission = submission_at(now, 1, &"W".repeat(30));
        let id = submission.id;
        store.insert(submission).await.unwrap();
        store
            .approve_if_pending(id, scores_totalling_4000(), now)
            .await
            .unwrap();

        // Act
        let second = store
            .reject_if_pending(id, RejectionReason::Fake, now)
            .await;

        // Assert
        match second.unwrap_err() {
            DomainError::StatusConflict {
                submission_id,
                expected,
                actual,
            } => {
                assert_eq!(submission_id, id);
                assert_eq!(expected, SubmissionStatus::Pending);
                assert_eq!(actual, SubmissionStatus::Approved);
            }
            other => panic!("expected StatusConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_to_pending_returns_prior_record_and_clears_decision() {
        // Arrange
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let submission = submission_at(now, 1, &"W".repeat(30));
        let id = submission.id;
        store.insert(submission).await.unwrap();
        store
            .approve_if_pending(id, scores_totalling_4000(), now)
            .await
            .unwrap();

        // Act
        let before = store.reset_to_pending(id).await.unwrap();

        // Assert
        assert_eq!(before.status, SubmissionStatus::Approved);
        assert_eq!(before.total_points, 4000);
        let after = SubmissionRepository::get(&store, id).await.unwrap().unwrap();
        assert_eq!(after.status, SubmissionStatus::Pending);
        assert_eq!(after.total_points, 0);
        assert_eq!(after.scores, ScoreBreakdown::default());
        assert!(after.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_wallet_lookup_is_case_insensitive_and_window_bounded() {
        // Arrange
        let store = MemoryStore::new();
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        store
            .insert(submission_at(created, 1, "AbCdEfGhIjKlMnOpQrStUvWxYz"))
            .await
            .unwrap();

        // Act / Assert
        let inside_window = created - Duration::hours(1);
        assert!(
            store
                .exists_for_wallet_since("ABCDEFGHIJKLMNOPQRSTUVWXYZ", inside_window)
                .await
                .unwrap()
        );
        let after_window = created + Duration::seconds(1);
        assert!(
            !store
                .exists_for_wallet_since("abcdefghijklmnopqrstuvwxyz", after_window)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_top_approved_in_cycle_breaks_ties_by_earliest_creation() {
        // Arrange
        let store = MemoryStore::new();
        let earlier = Utc.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap();
        let later = earlier + Duration::hours(2);
        let cycle = CycleId::of(earlier);
        let first = submission_at(earlier, 1, &"A".repeat(30));
        let second = submission_at(later, 2, &"B".repeat(30));
        let first_id = first.id;
        store.insert(first).await.unwrap();
        store.insert(second.clone()).await.unwrap();
        store
            .approve_if_pending(first_id, scores_totalling_4000(), later)
            .await
            .unwrap();
        store
            .approve_if_pending(second.id, scores_totalling_4000(), later)
            .await
            .unwrap();

        // Act
        let winner = store.top_approved_in_cycle(cycle).await.unwrap().unwrap();

        // Assert
        assert_eq!(winner.id, first_id);
    }

    #[tokio::test]
    async fn test_champion_cycle_is_unique_and_never_overwritten() {
        // Arrange
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let cycle = CycleId::of(now);
        let champion = Champion {
            cycle,
            actor_id: ActorId(1),
            display_name: "winner".to_owned(),
            submission_id: Uuid::new_v4(),
            story_preview: "preview".to_owned(),
            total_points: 4000,
            announced_at: now,
        };
        store.insert_new(champion.clone()).await.unwrap();

        // Act
        let second = store
            .insert_new(Champion {
                actor_id: ActorId(2),
                ..champion
            })
            .await;

        // Assert
        assert!(matches!(
            second.unwrap_err(),
            DomainError::ChampionAlreadySelected(c) if c == cycle
        ));
        let kept = store.get_by_cycle(cycle).await.unwrap().unwrap();
        assert_eq!(kept.actor_id, ActorId(1));
        assert_eq!(ChampionRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_refreshes_display_name_but_keeps_balance() {
        // Arrange
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        store.upsert(ActorId(7), "old-name", now).await.unwrap();
        store.adjust_points(ActorId(7), 1200).await.unwrap();

        // Act
        store.upsert(ActorId(7), "new-name", now).await.unwrap();

        // Assert
        let actor = ActorRepository::get(&store, ActorId(7))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(actor.display_name, "new-name");
        assert_eq!(actor.total_points, 1200);
    }

    #[tokio::test]
    async fn test_adjust_points_on_unknown_actor_is_not_found() {
        let store = MemoryStore::new();
        let result = store.adjust_points(ActorId(404), 100).await;
        assert!(matches!(
            result.unwrap_err(),
            DomainError::ActorNotFound(ActorId(404))
        ));
    }
}
