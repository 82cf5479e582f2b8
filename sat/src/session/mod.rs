//! Session sequencing
//!
//! The phase sequencer that drives the narrative: screens, transition
//! events, and the per-round question/answer/evaluate loop.

mod engine;
mod screen;

pub use engine::{DECRYPT_DELAY, Effect, Session, SessionEvent};
pub use screen::{Cue, Screen};
