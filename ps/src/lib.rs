//! PlanStore - S.M.A.R.T. plan domain types
//!
//! In-memory record of a single coaching session's plan. Each of the
//! five S.M.A.R.T. phases holds at most one finalized answer; a phase
//! transitions unset -> finalized exactly once and is never rewritten
//! within a session.
//!
//! # Modules
//!
//! - [`phase`] - The ordered `PhaseKey` enumeration
//! - [`plan`] - The write-once `Plan` record
//! - [`debrief`] - Terminal session output

pub mod debrief;
pub mod phase;
pub mod plan;

pub use debrief::Debrief;
pub use phase::PhaseKey;
pub use plan::{Plan, PlanError};
