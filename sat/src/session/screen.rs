//! Narrative screen states and cinematic cues

use planstore::PhaseKey;
use tracing::debug;

/// The current narrative/display state
///
/// A closed sum type so every dispatch over screens is exhaustive.
/// Exactly one value at a time; transitions are owned by the session
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Codename capture
    Start,
    /// Intro transmission
    IntroCinematic,
    /// "¿Listo, agente?" acknowledgment
    Ready,
    /// Goal statement capture
    GoalCapture,
    /// Fixed cosmetic pause before the first round
    Decrypting,
    /// Transition beat before round `k`
    RoundCinematic(usize),
    /// Question/answer/evaluation loop for round `k`
    Answering(usize),
    /// Closing transmission
    FinalCinematic,
    /// Terminal: the debrief is on display, no further transitions
    Complete,
}

impl Screen {
    /// The cue played while this screen is active, if any
    pub fn cue(self) -> Option<Cue> {
        debug!(?self, "Screen::cue: called");
        match self {
            Screen::IntroCinematic => Some(Cue::Intro),
            Screen::RoundCinematic(k) => PhaseKey::from_index(k).map(Cue::Phase),
            Screen::FinalCinematic => Some(Cue::Final),
            _ => None,
        }
    }
}

/// Which cinematic to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Opening transmission after identification
    Intro,
    /// Transition beat introducing one S.M.A.R.T. phase
    Phase(PhaseKey),
    /// Closing transmission before the debrief
    Final,
}
