//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here; the
//! session engine owns all sequencing state, this is only the
//! presentation-side scratch state (input buffer, pacing effects,
//! the playing cinematic, the final debrief).

use planstore::Debrief;
use rand::seq::IndexedRandom;
use tracing::debug;

use super::cinematic::CinematicPlayer;

/// Status words shown while the coach judges an answer
pub const ANALYZING_WORDS: &[&str] = &[
    "ANALIZANDO RESPUESTA",
    "PROCESANDO ESTRATEGIA",
    "CONSULTANDO UNIDAD DE ANÁLISIS",
    "VERIFICANDO CRITERIOS",
    "EVALUANDO PROTOCOLO",
];

/// Spinner glyphs for loading indicators
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Characters revealed per tick by the typing effect
const REVEAL_PER_TICK: usize = 2;

/// Presentation-side state
pub struct AppState {
    /// Text being typed on the active input line
    pub input: String,
    /// Spinner animation frame
    pub spinner_frame: usize,
    /// Characters of the question/feedback revealed so far
    pub revealed: usize,
    /// Status word for the current evaluation
    pub analyzing_word: &'static str,
    /// The playing cinematic, while a cinematic screen is active
    pub cinematic: Option<CinematicPlayer>,
    /// Final session output, once complete
    pub debrief: Option<Debrief>,
    /// Set when the user asked to exit
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create the initial presentation state
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self {
            input: String::new(),
            spinner_frame: 0,
            revealed: 0,
            analyzing_word: ANALYZING_WORDS[0],
            cinematic: None,
            debrief: None,
            should_quit: false,
        }
    }

    /// Advance time-based effects by one tick
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        self.revealed = self.revealed.saturating_add(REVEAL_PER_TICK);
        if let Some(cinematic) = self.cinematic.as_mut() {
            cinematic.tick();
        }
    }

    /// Restart the typing effect (new question or feedback on screen)
    pub fn reset_reveal(&mut self) {
        debug!("AppState::reset_reveal: called");
        self.revealed = 0;
    }

    /// Pick a fresh status word for a new evaluation
    pub fn pick_analyzing_word(&mut self) {
        let mut rng = rand::rng();
        self.analyzing_word = ANALYZING_WORDS.choose(&mut rng).copied().unwrap_or(ANALYZING_WORDS[0]);
        debug!(word = self.analyzing_word, "AppState::pick_analyzing_word: chosen");
    }

    /// Current spinner glyph
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// The revealed prefix of a text, for the typing effect
    pub fn reveal<'a>(&self, text: &'a str) -> &'a str {
        match text.char_indices().nth(self.revealed) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_spinner_and_reveal() {
        let mut state = AppState::new();
        state.tick();
        assert_eq!(state.spinner_frame, 1);
        assert_eq!(state.revealed, REVEAL_PER_TICK);
    }

    #[test]
    fn test_reveal_respects_char_boundaries() {
        let mut state = AppState::new();
        state.revealed = 1;
        // Multi-byte characters must not be split
        assert_eq!(state.reveal("¿Qué?"), "¿");
        state.revealed = 100;
        assert_eq!(state.reveal("¿Qué?"), "¿Qué?");
    }

    #[test]
    fn test_reset_reveal() {
        let mut state = AppState::new();
        state.revealed = 42;
        state.reset_reveal();
        assert_eq!(state.revealed, 0);
        assert_eq!(state.reveal("hola"), "");
    }

    #[test]
    fn test_spinner_wraps() {
        let mut state = AppState::new();
        for _ in 0..(SPINNER_FRAMES.len() * 3) {
            state.tick();
        }
        assert!(state.spinner_frame < SPINNER_FRAMES.len());
    }
}
