//! Scoring engine: a fixed-length sequential wizard.
//!
//! One allowed magnitude per criterion, in a fixed order, with backward
//! navigation and cancellation. Back always costs exactly one criterion's
//! answer; no criterion is scored twice without an explicit redo.

use uuid::Uuid;

use moondust_core::error::DomainError;
use moondust_core::model::{Criterion, ScoreBreakdown, is_allowed_magnitude};

/// Where the wizard currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStep {
    /// Awaiting a magnitude for this criterion.
    Criterion(Criterion),
    /// All five criteria scored; awaiting confirm, redo, or cancel.
    Summary {
        /// The five collected scores.
        breakdown: ScoreBreakdown,
        /// Their unweighted sum.
        total: u32,
    },
}

/// Transient moderator-side state for scoring one submission.
///
/// The number of collected scores doubles as the current criterion index.
#[derive(Debug, Clone)]
pub struct ScoringSession {
    /// The submission under review.
    pub submission_id: Uuid,
    collected: Vec<u32>,
}

impl ScoringSession {
    /// Opens a scoring session positioned at the first criterion.
    #[must_use]
    pub fn new(submission_id: Uuid) -> Self {
        Self {
            submission_id,
            collected: Vec::with_capacity(Criterion::COUNT),
        }
    }

    /// The criterion awaiting a score, or `None` at the summary.
    #[must_use]
    pub fn current_criterion(&self) -> Option<Criterion> {
        Criterion::ALL.get(self.collected.len()).copied()
    }

    /// The current wizard step.
    #[must_use]
    pub fn step(&self) -> ScoringStep {
        match self.current_criterion() {
            Some(criterion) => ScoringStep::Criterion(criterion),
            None => ScoringStep::Summary {
                breakdown: self.breakdown_unchecked(),
                total: self.total(),
            },
        }
    }

    /// Records a magnitude for the current criterion and advances.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the value is not an allowed
    /// magnitude, or if all criteria are already scored (redo first).
    pub fn select(&mut self, value: u32) -> Result<ScoringStep, DomainError> {
        if self.current_criterion().is_none() {
            return Err(DomainError::Validation(
                "all criteria already scored; confirm, redo, or cancel".to_owned(),
            ));
        }
        if !is_allowed_magnitude(value) {
            return Err(DomainError::Validation(format!(
                "{value} is not an allowed score magnitude"
            )));
        }
        self.collected.push(value);
        Ok(self.step())
    }

    /// Steps back one criterion, discarding its already-made selection.
    /// At the first criterion this is a no-op re-prompt.
    pub fn back(&mut self) -> ScoringStep {
        self.collected.pop();
        self.step()
    }

    /// Resets all scores and restarts at the first criterion.
    pub fn redo(&mut self) -> ScoringStep {
        self.collected.clear();
        self.step()
    }

    /// Whether all five criteria are scored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.collected.len() == Criterion::COUNT
    }

    /// The full breakdown, once complete.
    #[must_use]
    pub fn breakdown(&self) -> Option<ScoreBreakdown> {
        self.is_complete().then(|| self.breakdown_unchecked())
    }

    /// Unweighted sum of the scores collected so far.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.collected.iter().sum()
    }

    fn breakdown_unchecked(&self) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();
        for (criterion, value) in Criterion::ALL.iter().zip(&self.collected) {
            breakdown.set(*criterion, *value);
        }
        breakdown
    }
}
