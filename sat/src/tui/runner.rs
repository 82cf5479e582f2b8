//! TUI runner
//!
//! The async driver around the sequencer. Each pass draws the UI,
//! waits for a terminal event, and drains finished background tasks
//! (coach calls, the decrypt timer) back into the machine as events.

use std::sync::Arc;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::app::App;
use super::cinematic::CinematicPlayer;
use super::events::{Event, EventHandler};
use super::{Tui, views};
use crate::coach::{Coach, Verdict};
use crate::session::{DECRYPT_DELAY, Effect, Session, SessionEvent};

/// Results of background tasks, delivered to the main loop
#[derive(Debug)]
enum TaskOutcome {
    /// The decrypt pause elapsed
    DecryptDone,
    /// The coach produced a question (or its in-band fallback)
    Question(String),
    /// The coach judged an answer (or fail-soft rejected it)
    Verdict(Verdict),
}

/// The mission runner: terminal loop, sequencer, and effect execution
pub struct MissionRunner {
    terminal: Tui,
    app: App,
    session: Session,
    coach: Arc<Coach>,
    events: EventHandler,
    outcome_tx: mpsc::UnboundedSender<TaskOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<TaskOutcome>,
}

impl MissionRunner {
    /// Create a runner over an initialized terminal
    pub fn new(terminal: Tui, coach: Arc<Coach>) -> Self {
        debug!("MissionRunner::new: called");
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            terminal,
            app: App::new(),
            session: Session::new(),
            coach,
            events: EventHandler::new(super::TICK_RATE),
            outcome_tx,
            outcome_rx,
        }
    }

    /// Run the mission until the user quits
    pub async fn run(&mut self) -> Result<()> {
        info!("MissionRunner::run: starting");
        loop {
            self.terminal
                .draw(|frame| views::render(&self.session, &self.app.state, frame))?;

            match self.events.next().await? {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let screen = self.session.screen();
                        if let Some(event) = self.app.handle_key(key, screen) {
                            self.apply(event);
                        }
                    }
                }
                Event::Tick => self.on_tick(),
                Event::Resize(w, h) => {
                    debug!(w, h, "MissionRunner::run: resize");
                }
            }

            self.drain_outcomes();

            if self.app.state.should_quit {
                info!("MissionRunner::run: quit requested");
                break;
            }
        }
        Ok(())
    }

    /// Advance animations and notice cinematic completion
    fn on_tick(&mut self) {
        self.app.state.tick();
        let finished = self
            .app
            .state
            .cinematic
            .as_mut()
            .is_some_and(CinematicPlayer::take_completion);
        if finished {
            debug!("MissionRunner::on_tick: cinematic finished");
            self.app.state.cinematic = None;
            self.apply(SessionEvent::CinematicFinished);
        }
    }

    /// Feed finished background tasks into the sequencer
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            debug!(?outcome, "MissionRunner::drain_outcomes: outcome received");
            match outcome {
                TaskOutcome::DecryptDone => self.apply(SessionEvent::DecryptElapsed),
                TaskOutcome::Question(text) => {
                    self.app.state.reset_reveal();
                    self.apply(SessionEvent::QuestionArrived(text));
                }
                TaskOutcome::Verdict(verdict) => {
                    self.app.state.reset_reveal();
                    self.apply(SessionEvent::VerdictArrived(verdict));
                }
            }
        }
    }

    /// Apply one event and execute the resulting effects
    fn apply(&mut self, event: SessionEvent) {
        for effect in self.session.apply(event) {
            self.execute(effect);
        }
    }

    /// Execute one effect from the sequencer
    fn execute(&mut self, effect: Effect) {
        debug!(?effect, "MissionRunner::execute: called");
        match effect {
            Effect::PlayCinematic(cue) => {
                self.app.state.cinematic = Some(CinematicPlayer::new(cue));
            }
            Effect::StartDecryptTimer => {
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(DECRYPT_DELAY).await;
                    let _ = tx.send(TaskOutcome::DecryptDone);
                });
            }
            Effect::FetchQuestion { phase, goal, plan } => {
                let coach = Arc::clone(&self.coach);
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let question = coach.question(phase, &goal, &plan).await;
                    let _ = tx.send(TaskOutcome::Question(question));
                });
            }
            Effect::EvaluateAnswer { phase, goal, answer } => {
                self.app.state.pick_analyzing_word();
                let coach = Arc::clone(&self.coach);
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let verdict = coach.evaluate(phase, &goal, &answer).await;
                    let _ = tx.send(TaskOutcome::Verdict(verdict));
                });
            }
            Effect::PresentDebrief(debrief) => {
                info!(codename = %debrief.codename, "MissionRunner::execute: mission complete");
                self.app.state.debrief = Some(debrief);
            }
        }
    }
}
