//! The five S.M.A.R.T. phase keys
//!
//! A closed, ordered enumeration. The order of [`PhaseKey::ALL`] is the
//! progression sequence of a session.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One of the five S.M.A.R.T. criteria, in progression order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKey {
    S,
    M,
    A,
    R,
    T,
}

impl PhaseKey {
    /// All phases in progression order
    pub const ALL: [PhaseKey; 5] = [PhaseKey::S, PhaseKey::M, PhaseKey::A, PhaseKey::R, PhaseKey::T];

    /// Number of phases in a session
    pub const COUNT: usize = 5;

    /// Position of this phase in the progression sequence
    pub fn index(self) -> usize {
        debug!(?self, "PhaseKey::index: called");
        match self {
            PhaseKey::S => 0,
            PhaseKey::M => 1,
            PhaseKey::A => 2,
            PhaseKey::R => 3,
            PhaseKey::T => 4,
        }
    }

    /// Phase at the given progression position
    pub fn from_index(index: usize) -> Option<Self> {
        debug!(%index, "PhaseKey::from_index: called");
        Self::ALL.get(index).copied()
    }

    /// The single-letter key as shown on screen
    pub fn letter(self) -> &'static str {
        match self {
            PhaseKey::S => "S",
            PhaseKey::M => "M",
            PhaseKey::A => "A",
            PhaseKey::R => "R",
            PhaseKey::T => "T",
        }
    }

    /// Human-readable explanation of this phase's criterion
    ///
    /// Used verbatim in prompts and in the plan recap.
    pub fn explanation(self) -> &'static str {
        debug!(?self, "PhaseKey::explanation: called");
        match self {
            PhaseKey::S => "Specific (Específico): ¿Qué quieres lograr exactamente? Sé claro y detallado.",
            PhaseKey::M => "Measurable (Medible): ¿Cómo sabrás que lo has logrado? Define métricas o hitos concretos.",
            PhaseKey::A => {
                "Achievable (Alcanzable): ¿Es este objetivo realista con tus recursos y tiempo actuales? \
                 ¿Qué pasos debes seguir?"
            }
            PhaseKey::R => {
                "Relevant (Relevante): ¿Por qué es importante este objetivo para ti? \
                 ¿Cómo se alinea con tus valores y metas a largo plazo?"
            }
            PhaseKey::T => "Time-bound (Temporal): ¿Para cuándo quieres lograrlo? Establece una fecha límite clara.",
        }
    }

    /// Protocol title shown in the answering screen header
    pub fn title(self) -> &'static str {
        debug!(?self, "PhaseKey::title: called");
        match self {
            PhaseKey::S => "PROTOCOLO: ESPECÍFICO",
            PhaseKey::M => "PROTOCOLO: MEDIBLE",
            PhaseKey::A => "PROTOCOLO: ALCANZABLE",
            PhaseKey::R => "PROTOCOLO: RELEVANTE",
            PhaseKey::T => "PROTOCOLO: TEMPORAL",
        }
    }
}

impl std::fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_ordered() {
        for (i, phase) in PhaseKey::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
            assert_eq!(PhaseKey::from_index(i), Some(*phase));
        }
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert_eq!(PhaseKey::from_index(5), None);
        assert_eq!(PhaseKey::from_index(usize::MAX), None);
    }

    #[test]
    fn test_letters_spell_smart() {
        let word: String = PhaseKey::ALL.iter().map(|p| p.letter()).collect();
        assert_eq!(word, "SMART");
    }

    #[test]
    fn test_explanations_are_distinct() {
        for a in PhaseKey::ALL {
            for b in PhaseKey::ALL {
                if a != b {
                    assert_ne!(a.explanation(), b.explanation());
                    assert_ne!(a.title(), b.title());
                }
            }
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&PhaseKey::M).unwrap();
        assert_eq!(json, "\"M\"");
        let back: PhaseKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PhaseKey::M);
    }
}
