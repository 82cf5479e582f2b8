//! The phase sequencer state machine
//!
//! A pure, synchronous machine: it accepts [`SessionEvent`]s and
//! returns [`Effect`]s for the driver to execute (LLM calls, the
//! decrypt timer, cinematic playback). All policy lives here; no I/O
//! does. The driver feeds results back in as further events, one at a
//! time - the machine is never re-entered while an effect is pending.

use std::time::Duration;

use planstore::{Debrief, PhaseKey, Plan};
use tracing::{debug, warn};

use super::screen::{Cue, Screen};
use crate::coach::Verdict;

/// Fixed pacing pause between goal capture and the first round
///
/// Purely cosmetic, not cancellable, not configurable.
pub const DECRYPT_DELAY: Duration = Duration::from_millis(3000);

/// Input events accepted by the sequencer
///
/// Events that are invalid for the current screen are ignored with a
/// trace; the machine never panics and never gets stuck.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Codename submitted on the start screen
    NameSubmitted(String),
    /// The active cinematic completed (natural end or playback error)
    CinematicFinished,
    /// Explicit acknowledgment on the ready screen
    ReadyAcknowledged,
    /// Goal statement submitted
    GoalSubmitted(String),
    /// The fixed decrypting pause elapsed
    DecryptElapsed,
    /// The coach produced the question for the active round
    QuestionArrived(String),
    /// An answer submitted for the active round
    AnswerSubmitted(String),
    /// The coach judged the submitted answer
    VerdictArrived(Verdict),
}

/// Commands for the driver
#[derive(Debug, Clone)]
pub enum Effect {
    /// Start playing a cinematic cue
    PlayCinematic(Cue),
    /// Start the fixed decrypting pause
    StartDecryptTimer,
    /// Ask the coach for the question of the given phase
    FetchQuestion { phase: PhaseKey, goal: String, plan: Plan },
    /// Ask the coach to judge the given answer
    EvaluateAnswer {
        phase: PhaseKey,
        goal: String,
        answer: String,
    },
    /// Hand the finalized session output to the presentation layer
    PresentDebrief(Debrief),
}

/// The sequencer: owns the current screen and the session state
#[derive(Debug, Clone, Default)]
pub struct Session {
    screen: Option<Screen>,
    codename: String,
    goal: String,
    plan: Plan,
    active_phase: usize,
    question: Option<String>,
    feedback: Option<String>,
    pending_answer: Option<String>,
    awaiting_question: bool,
    evaluating: bool,
}

impl Session {
    /// Create a fresh session at the start screen
    pub fn new() -> Self {
        debug!("Session::new: called");
        Self {
            screen: Some(Screen::Start),
            ..Self::default()
        }
    }

    /// The current screen
    pub fn screen(&self) -> Screen {
        self.screen.unwrap_or(Screen::Start)
    }

    /// Agent codename (empty until submitted)
    pub fn codename(&self) -> &str {
        &self.codename
    }

    /// Goal statement (empty until submitted)
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// The plan so far
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Index of the phase currently being elicited
    ///
    /// Monotonically non-decreasing; advances by exactly 1 per
    /// approved answer.
    pub fn active_phase_index(&self) -> usize {
        self.active_phase
    }

    /// The phase currently being elicited
    pub fn active_phase(&self) -> Option<PhaseKey> {
        PhaseKey::from_index(self.active_phase)
    }

    /// The question on display for the active round, if any
    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    /// Rejection feedback on display, if any
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// Whether a question fetch is in flight
    pub fn awaiting_question(&self) -> bool {
        self.awaiting_question
    }

    /// Whether an evaluation is in flight
    pub fn evaluating(&self) -> bool {
        self.evaluating
    }

    /// Apply one event, returning the effects to execute
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        let screen = self.screen();
        debug!(?screen, ?event, "Session::apply: called");
        match (screen, event) {
            (Screen::Start, SessionEvent::NameSubmitted(name)) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    debug!("Session::apply: empty codename, ignoring");
                    return vec![];
                }
                self.codename = name;
                self.goto(Screen::IntroCinematic)
            }
            (Screen::IntroCinematic, SessionEvent::CinematicFinished) => self.goto(Screen::Ready),
            (Screen::Ready, SessionEvent::ReadyAcknowledged) => self.goto(Screen::GoalCapture),
            (Screen::GoalCapture, SessionEvent::GoalSubmitted(goal)) => {
                let goal = goal.trim().to_string();
                if goal.is_empty() {
                    debug!("Session::apply: empty goal, ignoring");
                    return vec![];
                }
                self.goal = goal;
                self.goto(Screen::Decrypting)
            }
            (Screen::Decrypting, SessionEvent::DecryptElapsed) => self.goto(Screen::RoundCinematic(0)),
            (Screen::RoundCinematic(k), SessionEvent::CinematicFinished) => {
                self.active_phase = k;
                self.goto(Screen::Answering(k))
            }
            (Screen::Answering(_), SessionEvent::QuestionArrived(text)) => {
                if !self.awaiting_question {
                    debug!("Session::apply: unsolicited question, ignoring");
                    return vec![];
                }
                self.awaiting_question = false;
                self.question = Some(text);
                vec![]
            }
            (Screen::Answering(k), SessionEvent::AnswerSubmitted(answer)) => self.submit_answer(k, answer),
            (Screen::Answering(k), SessionEvent::VerdictArrived(verdict)) => self.receive_verdict(k, verdict),
            (Screen::FinalCinematic, SessionEvent::CinematicFinished) => self.goto(Screen::Complete),
            (screen, event) => {
                debug!(?screen, ?event, "Session::apply: event invalid for screen, ignoring");
                vec![]
            }
        }
    }

    /// Enter a screen and emit its entry effects
    fn goto(&mut self, screen: Screen) -> Vec<Effect> {
        debug!(from = ?self.screen(), to = ?screen, "Session::goto: transition");
        self.screen = Some(screen);
        match screen {
            Screen::Decrypting => vec![Effect::StartDecryptTimer],
            Screen::Answering(k) => {
                self.question = None;
                self.feedback = None;
                self.pending_answer = None;
                self.evaluating = false;
                self.awaiting_question = true;
                match PhaseKey::from_index(k) {
                    Some(phase) => vec![Effect::FetchQuestion {
                        phase,
                        goal: self.goal.clone(),
                        plan: self.plan.clone(),
                    }],
                    None => {
                        warn!(round = k, "Session::goto: no phase for round");
                        vec![]
                    }
                }
            }
            Screen::Complete => {
                let debrief = Debrief::new(self.codename.clone(), self.goal.clone(), self.plan.clone());
                vec![Effect::PresentDebrief(debrief)]
            }
            _ => match screen.cue() {
                Some(cue) => vec![Effect::PlayCinematic(cue)],
                None => vec![],
            },
        }
    }

    /// Handle an answer submission within a round
    fn submit_answer(&mut self, round: usize, answer: String) -> Vec<Effect> {
        debug!(round, answer_len = answer.len(), "Session::submit_answer: called");
        if self.question.is_none() {
            debug!("Session::submit_answer: no question on display, ignoring");
            return vec![];
        }
        if self.evaluating {
            debug!("Session::submit_answer: evaluation already in flight, ignoring");
            return vec![];
        }
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            debug!("Session::submit_answer: empty answer, ignoring");
            return vec![];
        }
        let Some(phase) = PhaseKey::from_index(round) else {
            warn!(round, "Session::submit_answer: no phase for round");
            return vec![];
        };
        self.pending_answer = Some(answer.clone());
        self.feedback = None;
        self.evaluating = true;
        vec![Effect::EvaluateAnswer {
            phase,
            goal: self.goal.clone(),
            answer,
        }]
    }

    /// Handle the verdict for the pending answer
    fn receive_verdict(&mut self, round: usize, verdict: Verdict) -> Vec<Effect> {
        debug!(round, approved = verdict.approved, "Session::receive_verdict: called");
        if !self.evaluating {
            debug!("Session::receive_verdict: no evaluation in flight, ignoring");
            return vec![];
        }
        self.evaluating = false;

        if !verdict.approved {
            // Same question, new feedback; the user may retry without limit.
            self.pending_answer = None;
            self.feedback = Some(verdict.feedback);
            return vec![];
        }

        let Some(phase) = PhaseKey::from_index(round) else {
            warn!(round, "Session::receive_verdict: no phase for round");
            return vec![];
        };
        let Some(answer) = self.pending_answer.take() else {
            warn!(round, "Session::receive_verdict: approval without pending answer, ignoring");
            return vec![];
        };
        if let Err(e) = self.plan.finalize(phase, answer) {
            warn!(error = %e, "Session::receive_verdict: plan write refused, staying in round");
            return vec![];
        }

        if round + 1 < PhaseKey::COUNT {
            self.goto(Screen::RoundCinematic(round + 1))
        } else {
            self.goto(Screen::FinalCinematic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(feedback: &str) -> Verdict {
        Verdict {
            approved: true,
            feedback: feedback.to_string(),
        }
    }

    fn rejected(feedback: &str) -> Verdict {
        Verdict {
            approved: false,
            feedback: feedback.to_string(),
        }
    }

    /// Drive a session to the start of round 0 with a question displayed
    fn session_at_round_zero() -> Session {
        let mut s = Session::new();
        s.apply(SessionEvent::NameSubmitted("Ana".to_string()));
        s.apply(SessionEvent::CinematicFinished);
        s.apply(SessionEvent::ReadyAcknowledged);
        s.apply(SessionEvent::GoalSubmitted("Aprender guitarra".to_string()));
        s.apply(SessionEvent::DecryptElapsed);
        s.apply(SessionEvent::CinematicFinished);
        s.apply(SessionEvent::QuestionArrived("¿Qué exactamente?".to_string()));
        s
    }

    /// Approve the current round with the given answer
    fn approve_round(s: &mut Session, answer: &str) {
        s.apply(SessionEvent::AnswerSubmitted(answer.to_string()));
        s.apply(SessionEvent::VerdictArrived(approved("Excelente.")));
    }

    #[test]
    fn test_happy_path_screen_sequence() {
        let mut s = Session::new();
        assert_eq!(s.screen(), Screen::Start);

        let effects = s.apply(SessionEvent::NameSubmitted("  Ana  ".to_string()));
        assert_eq!(s.screen(), Screen::IntroCinematic);
        assert_eq!(s.codename(), "Ana");
        assert!(matches!(effects[0], Effect::PlayCinematic(Cue::Intro)));

        s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.screen(), Screen::Ready);

        s.apply(SessionEvent::ReadyAcknowledged);
        assert_eq!(s.screen(), Screen::GoalCapture);

        let effects = s.apply(SessionEvent::GoalSubmitted("Aprender guitarra".to_string()));
        assert_eq!(s.screen(), Screen::Decrypting);
        assert!(matches!(effects[0], Effect::StartDecryptTimer));

        let effects = s.apply(SessionEvent::DecryptElapsed);
        assert_eq!(s.screen(), Screen::RoundCinematic(0));
        assert!(matches!(effects[0], Effect::PlayCinematic(Cue::Phase(PhaseKey::S))));

        let effects = s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.screen(), Screen::Answering(0));
        assert!(matches!(effects[0], Effect::FetchQuestion { phase: PhaseKey::S, .. }));
        assert!(s.awaiting_question());
    }

    #[test]
    fn test_empty_name_and_goal_are_ignored() {
        let mut s = Session::new();
        assert!(s.apply(SessionEvent::NameSubmitted("   ".to_string())).is_empty());
        assert_eq!(s.screen(), Screen::Start);

        s.apply(SessionEvent::NameSubmitted("Ana".to_string()));
        s.apply(SessionEvent::CinematicFinished);
        s.apply(SessionEvent::ReadyAcknowledged);
        assert!(s.apply(SessionEvent::GoalSubmitted("".to_string())).is_empty());
        assert_eq!(s.screen(), Screen::GoalCapture);
    }

    #[test]
    fn test_cinematic_completion_fires_at_most_once() {
        let mut s = Session::new();
        s.apply(SessionEvent::NameSubmitted("Ana".to_string()));
        assert_eq!(s.screen(), Screen::IntroCinematic);

        // Natural end then error signal: exactly one transition out
        s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.screen(), Screen::Ready);
        let effects = s.apply(SessionEvent::CinematicFinished);
        assert!(effects.is_empty());
        assert_eq!(s.screen(), Screen::Ready);
    }

    #[test]
    fn test_full_mission_finalizes_all_phases_once() {
        let mut s = session_at_round_zero();
        let answers = ["A1", "A2", "A3", "A4", "A5"];

        for (k, answer) in answers.iter().enumerate() {
            assert_eq!(s.screen(), Screen::Answering(k));
            assert_eq!(s.active_phase_index(), k);
            approve_round(&mut s, answer);
            if k < 4 {
                s.apply(SessionEvent::CinematicFinished);
                s.apply(SessionEvent::QuestionArrived(format!("¿Pregunta {}?", k + 2)));
            }
        }

        assert_eq!(s.screen(), Screen::FinalCinematic);
        s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.screen(), Screen::Complete);

        assert!(s.plan().is_complete());
        for (phase, answer) in PhaseKey::ALL.iter().zip(answers) {
            assert_eq!(s.plan().answer(*phase), Some(answer));
        }
    }

    #[test]
    fn test_complete_emits_debrief_once_and_is_terminal() {
        let mut s = session_at_round_zero();
        for k in 0..5 {
            approve_round(&mut s, &format!("respuesta {}", k + 1));
            if k < 4 {
                s.apply(SessionEvent::CinematicFinished);
                s.apply(SessionEvent::QuestionArrived("¿?".to_string()));
            }
        }
        let effects = s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.screen(), Screen::Complete);
        assert!(matches!(&effects[0], Effect::PresentDebrief(d)
            if d.codename == "Ana" && d.goal == "Aprender guitarra" && d.plan.is_complete()));

        // Terminal: everything after is a no-op
        assert!(s.apply(SessionEvent::CinematicFinished).is_empty());
        assert!(s.apply(SessionEvent::AnswerSubmitted("tarde".to_string())).is_empty());
        assert_eq!(s.screen(), Screen::Complete);
    }

    #[test]
    fn test_rejection_keeps_question_and_phase() {
        let mut s = session_at_round_zero();
        let question_before = s.question().unwrap().to_string();

        s.apply(SessionEvent::AnswerSubmitted("algo vago".to_string()));
        let effects = s.apply(SessionEvent::VerdictArrived(rejected("Demasiado vago, agente.")));

        // No re-fetch, no advance; only the feedback changes
        assert!(effects.is_empty());
        assert_eq!(s.screen(), Screen::Answering(0));
        assert_eq!(s.active_phase_index(), 0);
        assert_eq!(s.question(), Some(question_before.as_str()));
        assert_eq!(s.feedback(), Some("Demasiado vago, agente."));
        assert!(!s.plan().is_finalized(PhaseKey::S));
    }

    #[test]
    fn test_reject_then_approve_stores_approved_answer_only() {
        let mut s = session_at_round_zero();

        s.apply(SessionEvent::AnswerSubmitted("vago".to_string()));
        s.apply(SessionEvent::VerdictArrived(rejected("Más detalle.")));
        assert_eq!(s.active_phase_index(), 0);

        s.apply(SessionEvent::AnswerSubmitted("Tocar tres canciones completas".to_string()));
        s.apply(SessionEvent::VerdictArrived(approved("Excelente.")));

        assert_eq!(s.plan().answer(PhaseKey::S), Some("Tocar tres canciones completas"));
        assert_eq!(s.screen(), Screen::RoundCinematic(1));
        s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.active_phase_index(), 1);
    }

    #[test]
    fn test_unbounded_retries_within_round() {
        let mut s = session_at_round_zero();
        for i in 0..20 {
            s.apply(SessionEvent::AnswerSubmitted(format!("intento {}", i)));
            s.apply(SessionEvent::VerdictArrived(rejected("No.")));
            assert_eq!(s.screen(), Screen::Answering(0));
        }
        approve_round(&mut s, "respuesta final");
        assert_eq!(s.screen(), Screen::RoundCinematic(1));
    }

    #[test]
    fn test_phase_index_never_advances_on_rejection() {
        let mut s = session_at_round_zero();
        let mut last = s.active_phase_index();

        s.apply(SessionEvent::AnswerSubmitted("x".to_string()));
        s.apply(SessionEvent::VerdictArrived(rejected("No.")));
        assert_eq!(s.active_phase_index(), last);

        approve_round(&mut s, "respuesta válida");
        s.apply(SessionEvent::CinematicFinished);
        assert_eq!(s.active_phase_index(), last + 1);
        last = s.active_phase_index();
        assert_eq!(last, 1);
    }

    #[test]
    fn test_answer_ignored_without_question_or_while_evaluating() {
        let mut s = Session::new();
        s.apply(SessionEvent::NameSubmitted("Ana".to_string()));
        s.apply(SessionEvent::CinematicFinished);
        s.apply(SessionEvent::ReadyAcknowledged);
        s.apply(SessionEvent::GoalSubmitted("Meta".to_string()));
        s.apply(SessionEvent::DecryptElapsed);
        s.apply(SessionEvent::CinematicFinished);

        // Question still in flight
        assert!(s.apply(SessionEvent::AnswerSubmitted("temprano".to_string())).is_empty());

        s.apply(SessionEvent::QuestionArrived("¿?".to_string()));
        let effects = s.apply(SessionEvent::AnswerSubmitted("respuesta".to_string()));
        assert_eq!(effects.len(), 1);

        // Second submission while the first evaluation is in flight
        assert!(s.apply(SessionEvent::AnswerSubmitted("otra".to_string())).is_empty());
    }

    #[test]
    fn test_unsolicited_question_and_verdict_are_ignored() {
        let mut s = session_at_round_zero();
        let question_before = s.question().unwrap().to_string();

        // A second question while one is displayed
        assert!(s.apply(SessionEvent::QuestionArrived("¿otra?".to_string())).is_empty());
        assert_eq!(s.question(), Some(question_before.as_str()));

        // A verdict with no evaluation in flight
        assert!(s.apply(SessionEvent::VerdictArrived(approved("?"))).is_empty());
        assert!(!s.plan().is_finalized(PhaseKey::S));
    }

    #[test]
    fn test_fail_soft_verdict_keeps_session_alive() {
        let mut s = session_at_round_zero();
        s.apply(SessionEvent::AnswerSubmitted("respuesta".to_string()));
        s.apply(SessionEvent::VerdictArrived(rejected(crate::coach::EVALUATE_FALLBACK)));

        assert_eq!(s.screen(), Screen::Answering(0));
        assert!(s.feedback().is_some_and(|f| !f.is_empty()));

        // The user can still retry and succeed
        approve_round(&mut s, "respuesta mejor");
        assert_eq!(s.screen(), Screen::RoundCinematic(1));
    }
}
