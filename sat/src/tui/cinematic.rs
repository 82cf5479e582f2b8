//! Cinematic playback
//!
//! Plays embedded ASCII "transmission" scripts frame by frame on TUI
//! ticks. The player implements the single-fire completion contract:
//! natural end, playback error, and user skip all funnel into one
//! latch, and the completion signal is consumed at most once per
//! cinematic instance.

use planstore::PhaseKey;
use tracing::{debug, warn};

use crate::session::Cue;

/// Frame separator inside a cinematic script
const FRAME_SEPARATOR: &str = "\n---\n";

/// Ticks each frame stays on screen (about 2.5s at the 50ms tick rate)
const TICKS_PER_FRAME: u32 = 50;

/// Embedded cinematic script for a cue
fn script(cue: Cue) -> &'static str {
    debug!(?cue, "script: called");
    match cue {
        Cue::Intro => include_str!("../../cinematics/intro.txt"),
        Cue::Phase(PhaseKey::S) => include_str!("../../cinematics/s.txt"),
        Cue::Phase(PhaseKey::M) => include_str!("../../cinematics/m.txt"),
        Cue::Phase(PhaseKey::A) => include_str!("../../cinematics/a.txt"),
        Cue::Phase(PhaseKey::R) => include_str!("../../cinematics/r.txt"),
        Cue::Phase(PhaseKey::T) => include_str!("../../cinematics/t.txt"),
        Cue::Final => include_str!("../../cinematics/final.txt"),
    }
}

/// One playing cinematic instance
#[derive(Debug)]
pub struct CinematicPlayer {
    frames: Vec<String>,
    current: usize,
    ticks_in_frame: u32,
    /// Set once playback ended, for whatever reason
    completed: bool,
    /// Set once the completion signal has been handed out
    signaled: bool,
}

impl CinematicPlayer {
    /// Start playing the script for a cue
    ///
    /// An empty or missing script counts as a playback error: the
    /// player starts already completed so the session still moves
    /// forward.
    pub fn new(cue: Cue) -> Self {
        debug!(?cue, "CinematicPlayer::new: called");
        let frames: Vec<String> = script(cue)
            .split(FRAME_SEPARATOR)
            .map(|f| f.trim_matches('\n').to_string())
            .filter(|f| !f.trim().is_empty())
            .collect();

        let completed = frames.is_empty();
        if completed {
            warn!(?cue, "CinematicPlayer::new: empty script, completing immediately");
        }

        Self {
            frames,
            current: 0,
            ticks_in_frame: 0,
            completed,
            signaled: false,
        }
    }

    /// Text of the frame currently on screen
    pub fn frame(&self) -> &str {
        self.frames.get(self.current).map(String::as_str).unwrap_or_default()
    }

    /// Playback progress in [0, 1] for the progress gauge
    pub fn progress(&self) -> f64 {
        if self.frames.is_empty() || self.completed {
            return 1.0;
        }
        (self.current as f64 + f64::from(self.ticks_in_frame) / f64::from(TICKS_PER_FRAME)) / self.frames.len() as f64
    }

    /// Advance playback by one tick
    pub fn tick(&mut self) {
        if self.completed {
            return;
        }
        self.ticks_in_frame += 1;
        if self.ticks_in_frame >= TICKS_PER_FRAME {
            self.ticks_in_frame = 0;
            if self.current + 1 < self.frames.len() {
                self.current += 1;
                debug!(frame = self.current, "CinematicPlayer::tick: next frame");
            } else {
                debug!("CinematicPlayer::tick: natural end");
                self.completed = true;
            }
        }
    }

    /// Natural end or user skip
    pub fn signal_end(&mut self) {
        debug!(already = self.completed, "CinematicPlayer::signal_end: called");
        self.completed = true;
    }

    /// Playback failure; treated identically to a natural end
    pub fn signal_error(&mut self) {
        debug!(already = self.completed, "CinematicPlayer::signal_error: called");
        self.completed = true;
    }

    /// Consume the completion signal
    ///
    /// Returns true exactly once per cinematic instance, no matter how
    /// many end/error signals arrived or in what order.
    pub fn take_completion(&mut self) -> bool {
        if self.completed && !self.signaled {
            debug!("CinematicPlayer::take_completion: firing");
            self.signaled = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_cues_have_frames() {
        let cues = [
            Cue::Intro,
            Cue::Phase(PhaseKey::S),
            Cue::Phase(PhaseKey::M),
            Cue::Phase(PhaseKey::A),
            Cue::Phase(PhaseKey::R),
            Cue::Phase(PhaseKey::T),
            Cue::Final,
        ];
        for cue in cues {
            let player = CinematicPlayer::new(cue);
            assert!(!player.frames.is_empty(), "{:?} has no frames", cue);
            assert!(!player.frame().is_empty());
        }
    }

    #[test]
    fn test_natural_end_after_all_frames() {
        let mut player = CinematicPlayer::new(Cue::Intro);
        let total_ticks = player.frames.len() as u32 * TICKS_PER_FRAME;
        for _ in 0..total_ticks {
            assert!(!player.take_completion());
            player.tick();
        }
        assert!(player.take_completion());
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut player = CinematicPlayer::new(Cue::Final);
        player.signal_end();
        assert!(player.take_completion());
        assert!(!player.take_completion());

        // A late error signal after the natural end is a no-op
        player.signal_error();
        assert!(!player.take_completion());
    }

    #[test]
    fn test_error_then_end_fires_exactly_once() {
        let mut player = CinematicPlayer::new(Cue::Phase(PhaseKey::S));
        player.signal_error();
        player.signal_end();
        assert!(player.take_completion());
        assert!(!player.take_completion());
    }

    #[test]
    fn test_ticks_after_completion_are_inert() {
        let mut player = CinematicPlayer::new(Cue::Intro);
        player.signal_end();
        assert!(player.take_completion());
        for _ in 0..1000 {
            player.tick();
        }
        assert!(!player.take_completion());
    }

    #[test]
    fn test_progress_monotone() {
        let mut player = CinematicPlayer::new(Cue::Intro);
        let mut last = 0.0;
        for _ in 0..(player.frames.len() as u32 * TICKS_PER_FRAME) {
            let p = player.progress();
            assert!(p >= last);
            last = p;
            player.tick();
        }
        assert_eq!(player.progress(), 1.0);
    }
}
