//! Key handling per screen
//!
//! Translates terminal key events into session events. Input trimming
//! and the empty-input rejection live here: the machine only ever sees
//! non-empty submissions (and ignores empty ones anyway).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::AppState;
use crate::session::{Screen, SessionEvent};

/// TUI application: presentation state plus key dispatch
pub struct App {
    /// Presentation state
    pub state: AppState,
}

impl App {
    /// Create the app in its initial state
    pub fn new() -> Self {
        debug!("App::new: called");
        Self { state: AppState::new() }
    }

    /// Handle a key press for the given screen
    ///
    /// Returns the session event to feed into the sequencer, if the
    /// key completed one.
    pub fn handle_key(&mut self, key: KeyEvent, screen: Screen) -> Option<SessionEvent> {
        debug!(?key.code, ?screen, "App::handle_key: called");

        // Ctrl+C exits from any screen
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C, quitting");
            self.state.should_quit = true;
            return None;
        }

        match screen {
            Screen::Start => self.handle_line_input(key, SessionEvent::NameSubmitted),
            Screen::GoalCapture => self.handle_line_input(key, SessionEvent::GoalSubmitted),
            Screen::Answering(_) => self.handle_line_input(key, SessionEvent::AnswerSubmitted),
            Screen::IntroCinematic | Screen::RoundCinematic(_) | Screen::FinalCinematic => {
                // Enter only, matching the on-screen "[Enter] omitir" hint
                if key.code == KeyCode::Enter {
                    debug!("App::handle_key: skipping cinematic");
                    if let Some(cinematic) = self.state.cinematic.as_mut() {
                        cinematic.signal_end();
                    }
                }
                None
            }
            Screen::Ready => {
                if key.code == KeyCode::Enter {
                    debug!("App::handle_key: ready acknowledged");
                    return Some(SessionEvent::ReadyAcknowledged);
                }
                None
            }
            Screen::Decrypting => None,
            Screen::Complete => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    debug!("App::handle_key: quit from debrief");
                    self.state.should_quit = true;
                }
                None
            }
        }
    }

    /// Line editing shared by the three text-capture screens
    fn handle_line_input(
        &mut self,
        key: KeyEvent,
        submit: impl FnOnce(String) -> SessionEvent,
    ) -> Option<SessionEvent> {
        match key.code {
            KeyCode::Char(c) => {
                self.state.input.push(c);
                None
            }
            KeyCode::Backspace => {
                self.state.input.pop();
                None
            }
            KeyCode::Enter => {
                let text = self.state.input.trim().to_string();
                if text.is_empty() {
                    debug!("App::handle_line_input: empty submission rejected");
                    return None;
                }
                self.state.input.clear();
                Some(submit(text))
            }
            _ => None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
