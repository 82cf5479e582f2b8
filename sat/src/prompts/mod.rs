//! Prompt templates for the S.A.T. coaching persona
//!
//! Handlebars templates embedded at build time, with an optional
//! per-project override directory.

pub mod embedded;
mod loader;

pub use loader::{EvaluateContext, ProgressLine, PromptLoader, QuestionContext};
