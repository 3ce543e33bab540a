//! Rate limiter: rolling 24-hour window over past submissions.
//!
//! Two independent checks, actor identity and case-insensitive wallet,
//! either of which denies the whole attempt. Pure read-then-decide queries;
//! no side effects. The wallet check runs at the step where the wallet is
//! first supplied so an actor cannot burn several prompts before discovering
//! the denial.

use chrono::Duration;

use moondust_core::clock::Clock;
use moondust_core::error::{DomainError, RateLimitScope};
use moondust_core::model::ActorId;
use moondust_core::repository::SubmissionRepository;

/// Length of the rolling cooldown window.
pub const WINDOW_HOURS: i64 = 24;

/// Denies if the actor created any submission within the trailing window.
///
/// # Errors
///
/// Returns `DomainError::RateLimited` with the actor scope on denial, or
/// passes through store errors.
pub async fn check_actor(
    actor_id: ActorId,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<(), DomainError> {
    let since = clock.now() - Duration::hours(WINDOW_HOURS);
    if submissions.exists_for_actor_since(actor_id, since).await? {
        tracing::debug!(%actor_id, "actor cooldown active");
        return Err(DomainError::RateLimited {
            scope: RateLimitScope::Actor,
        });
    }
    Ok(())
}

/// Denies if any submission with a case-insensitively matching wallet was
/// created within the trailing window.
///
/// # Errors
///
/// Returns `DomainError::RateLimited` with the wallet scope on denial, or
/// passes through store errors.
pub async fn check_wallet(
    wallet: &str,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<(), DomainError> {
    let since = clock.now() - Duration::hours(WINDOW_HOURS);
    if submissions.exists_for_wallet_since(wallet, since).await? {
        tracing::debug!("wallet cooldown active");
        return Err(DomainError::RateLimited {
            scope: RateLimitScope::Wallet,
        });
    }
    Ok(())
}

/// Combined gate: actor check always, wallet check when a wallet is known.
///
/// # Errors
///
/// Returns `DomainError::RateLimited` carrying whichever scope denied.
pub async fn may_start(
    actor_id: ActorId,
    wallet: Option<&str>,
    clock: &dyn Clock,
    submissions: &dyn SubmissionRepository,
) -> Result<(), DomainError> {
    check_actor(actor_id, clock, submissions).await?;
    if let Some(wallet) = wallet {
        check_wallet(wallet, clock, submissions).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use moondust_core::cycle::CycleId;
    use moondust_core::model::{ScoreBreakdown, StoryCategory, Submission, SubmissionStatus};
    use moondust_store::MemoryStore;
    use moondust_test_support::FixedClock;
    use uuid::Uuid;

    use super::*;

    const WALLET: &str = "W123456789012345678901234567890";

    async fn store_with_submission_at(
        created_at: chrono::DateTime<Utc>,
        actor: ActorId,
    ) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(Submission {
                id: Uuid::new_v4(),
                actor_id: actor,
                display_name: "earlier".to_owned(),
                category: StoryCategory::Moon,
                wallet: WALLET.to_owned(),
                contract: "C".repeat(30),
                amount: "10x".to_owned(),
                story: "a story long enough to pass validation".to_owned(),
                status: SubmissionStatus::Pending,
                rejection_reason: None,
                scores: ScoreBreakdown::default(),
                total_points: 0,
                cycle: CycleId::of(created_at),
                created_at,
                reviewed_at: None,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_wallet_denied_within_24_hours_allowed_one_second_after() {
        // Arrange
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = store_with_submission_at(created, ActorId(1)).await;

        // Act / Assert: 23h59m59s later: still inside the window.
        let inside = FixedClock(created + chrono::Duration::hours(24) - chrono::Duration::seconds(1));
        let denied = check_wallet(WALLET, &inside, &store).await;
        assert!(matches!(
            denied.unwrap_err(),
            DomainError::RateLimited {
                scope: RateLimitScope::Wallet
            }
        ));

        // 24h 1s later: window elapsed.
        let after = FixedClock(created + chrono::Duration::hours(24) + chrono::Duration::seconds(1));
        assert!(check_wallet(WALLET, &after, &store).await.is_ok());
    }

    #[tokio::test]
    async fn test_wallet_check_matches_case_insensitively() {
        // Arrange
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = store_with_submission_at(created, ActorId(1)).await;
        let clock = FixedClock(created + chrono::Duration::hours(1));

        // Act
        let denied = check_wallet(&WALLET.to_lowercase(), &clock, &store).await;

        // Assert
        assert!(denied.is_err());
    }

    #[tokio::test]
    async fn test_actor_denied_even_when_wallet_differs() {
        // Arrange
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = store_with_submission_at(created, ActorId(1)).await;
        let clock = FixedClock(created + chrono::Duration::hours(1));

        // Act
        let denied = may_start(ActorId(1), Some(&"X".repeat(30)), &clock, &store).await;

        // Assert
        assert!(matches!(
            denied.unwrap_err(),
            DomainError::RateLimited {
                scope: RateLimitScope::Actor
            }
        ));
    }

    #[tokio::test]
    async fn test_other_actor_with_fresh_wallet_is_allowed() {
        // Arrange
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = store_with_submission_at(created, ActorId(1)).await;
        let clock = FixedClock(created + chrono::Duration::hours(1));

        // Act / Assert
        assert!(
            may_start(ActorId(2), Some(&"X".repeat(30)), &clock, &store)
                .await
                .is_ok()
        );
    }
}
