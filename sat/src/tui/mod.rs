//! Terminal User Interface for the S.A.T. mission
//!
//! A full-screen spy-console experience:
//! - ASCII cinematics between phases (skippable with Enter)
//! - Line input for codename, goal, and answers
//! - Typewriter reveal for the coach's transmissions
//! - The final mission debrief with the complete plan

mod app;
mod cinematic;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use cinematic::CinematicPlayer;
pub use events::{Event, EventHandler};
pub use runner::MissionRunner;
pub use state::AppState;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::coach::Coach;

/// Refresh interval for animations and input polling
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the mission, restoring the terminal even on error
pub async fn run(coach: Arc<Coach>) -> Result<()> {
    let terminal = init()?;

    struct TerminalGuard;
    impl Drop for TerminalGuard {
        fn drop(&mut self) {
            let _ = restore();
        }
    }
    let _guard = TerminalGuard;

    let mut runner = MissionRunner::new(terminal, coach);
    runner.run().await
}
