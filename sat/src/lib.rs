//! S.A.T. Mission - guided S.M.A.R.T. goal definition in the terminal
//!
//! A narrative coaching session framed as a covert operation: the
//! S.A.T. (Sistema de Asistencia Táctica) interrogates the agent
//! through the five S.M.A.R.T. phases, judging each answer against the
//! phase's criterion until the full plan is finalized.
//!
//! # Modules
//!
//! - [`session`] - The phase sequencer state machine (pure, no I/O)
//! - [`coach`] - The evaluation service client over the LLM
//! - [`llm`] - LLM client trait and provider implementations
//! - [`prompts`] - Handlebars prompt templates with user overrides
//! - [`tui`] - The spy-console terminal interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod coach;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod tui;

// Re-export commonly used types
pub use coach::{Coach, Verdict};
pub use config::{Config, LlmConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use prompts::PromptLoader;
pub use session::{Effect, Screen, Session, SessionEvent};
