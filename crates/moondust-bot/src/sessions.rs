//! In-memory per-actor session store.
//!
//! One actor holds at most one live session: starting intake replaces a
//! stale run, and a moderator opening the scoring wizard replaces whatever
//! they had before. Sessions are transient scratch state; on restart they
//! are gone and the actor simply starts over.

use std::collections::HashMap;
use std::sync::Mutex;

use moondust_core::error::DomainError;
use moondust_core::model::ActorId;
use moondust_intake::IntakeSession;
use moondust_review::ScoringSession;

/// The two kinds of workflow an actor can be inside.
#[derive(Debug, Clone)]
pub enum Session {
    /// The guided submission workflow.
    Intake(IntakeSession),
    /// The moderator's scoring wizard.
    Scoring(ScoringSession),
}

/// Keyed by actor, guarded by a single mutex. Contention is per-interaction
/// and short-lived; sessions are taken out, mutated, and put back.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<ActorId, Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ActorId, Session>>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::Infrastructure("session store lock poisoned".to_owned()))
    }

    /// Stores (or replaces) the actor's session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn put(&self, actor_id: ActorId, session: Session) -> Result<(), DomainError> {
        self.lock()?.insert(actor_id, session);
        Ok(())
    }

    /// Removes and returns the actor's session, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn take(&self, actor_id: ActorId) -> Result<Option<Session>, DomainError> {
        Ok(self.lock()?.remove(&actor_id))
    }

    /// Drops the actor's session without returning it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn clear(&self, actor_id: ActorId) -> Result<(), DomainError> {
        self.lock()?.remove(&actor_id);
        Ok(())
    }
}
