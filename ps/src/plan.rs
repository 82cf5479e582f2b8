//! The write-once S.M.A.R.T. plan record

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::phase::PhaseKey;

/// Errors from plan mutation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Phase {0} is already finalized and cannot be overwritten")]
    AlreadyFinalized(PhaseKey),

    #[error("Answer for phase {0} is empty")]
    EmptyAnswer(PhaseKey),
}

/// Mapping from phase key to an unset marker or a finalized answer
///
/// Append-only per key: once a phase is finalized its value is fixed
/// for the remainder of the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    answers: [Option<String>; PhaseKey::COUNT],
}

impl Plan {
    /// Create an empty plan with all five phases unset
    pub fn new() -> Self {
        debug!("Plan::new: called");
        Self::default()
    }

    /// Finalize the answer for a phase
    ///
    /// This is the one and only write for the key; a second write for
    /// the same phase is an error.
    pub fn finalize(&mut self, phase: PhaseKey, answer: impl Into<String>) -> Result<(), PlanError> {
        let answer = answer.into();
        debug!(?phase, answer_len = answer.len(), "Plan::finalize: called");
        let slot = &mut self.answers[phase.index()];
        if slot.is_some() {
            debug!(?phase, "Plan::finalize: already finalized");
            return Err(PlanError::AlreadyFinalized(phase));
        }
        if answer.trim().is_empty() {
            debug!(?phase, "Plan::finalize: empty answer");
            return Err(PlanError::EmptyAnswer(phase));
        }
        *slot = Some(answer);
        Ok(())
    }

    /// Get the finalized answer for a phase, if any
    pub fn answer(&self, phase: PhaseKey) -> Option<&str> {
        self.answers[phase.index()].as_deref()
    }

    /// Whether the given phase has been finalized
    pub fn is_finalized(&self, phase: PhaseKey) -> bool {
        self.answers[phase.index()].is_some()
    }

    /// Whether all five phases are finalized
    pub fn is_complete(&self) -> bool {
        let complete = self.answers.iter().all(Option::is_some);
        debug!(%complete, "Plan::is_complete: called");
        complete
    }

    /// Number of finalized phases
    pub fn finalized_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Iterate `(phase, answer)` pairs in progression order
    pub fn iter(&self) -> impl Iterator<Item = (PhaseKey, Option<&str>)> {
        PhaseKey::ALL.into_iter().map(|p| (p, self.answer(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plan_is_empty() {
        let plan = Plan::new();
        assert!(!plan.is_complete());
        assert_eq!(plan.finalized_count(), 0);
        for phase in PhaseKey::ALL {
            assert_eq!(plan.answer(phase), None);
            assert!(!plan.is_finalized(phase));
        }
    }

    #[test]
    fn test_finalize_writes_once() {
        let mut plan = Plan::new();
        plan.finalize(PhaseKey::S, "Correr 5km tres veces por semana").unwrap();
        assert_eq!(plan.answer(PhaseKey::S), Some("Correr 5km tres veces por semana"));

        let err = plan.finalize(PhaseKey::S, "otra respuesta").unwrap_err();
        assert_eq!(err, PlanError::AlreadyFinalized(PhaseKey::S));
        // The original answer survives the rejected overwrite
        assert_eq!(plan.answer(PhaseKey::S), Some("Correr 5km tres veces por semana"));
    }

    #[test]
    fn test_finalize_rejects_empty_answer() {
        let mut plan = Plan::new();
        let err = plan.finalize(PhaseKey::M, "   ").unwrap_err();
        assert_eq!(err, PlanError::EmptyAnswer(PhaseKey::M));
        assert!(!plan.is_finalized(PhaseKey::M));
    }

    #[test]
    fn test_complete_after_all_five() {
        let mut plan = Plan::new();
        for (i, phase) in PhaseKey::ALL.iter().enumerate() {
            assert!(!plan.is_complete());
            plan.finalize(*phase, format!("respuesta {}", i + 1)).unwrap();
            assert_eq!(plan.finalized_count(), i + 1);
        }
        assert!(plan.is_complete());
    }

    #[test]
    fn test_iter_in_progression_order() {
        let mut plan = Plan::new();
        plan.finalize(PhaseKey::A, "alcanzable").unwrap();

        let pairs: Vec<_> = plan.iter().collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], (PhaseKey::S, None));
        assert_eq!(pairs[2], (PhaseKey::A, Some("alcanzable")));
        assert_eq!(pairs[4], (PhaseKey::T, None));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut plan = Plan::new();
        plan.finalize(PhaseKey::S, "específico").unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.answer(PhaseKey::S), Some("específico"));
        assert_eq!(back.answer(PhaseKey::T), None);
    }
}
