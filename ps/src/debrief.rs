//! Terminal session output
//!
//! Produced exactly once, when the session reaches its terminal state.
//! No further mutation occurs after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plan::Plan;

/// The finalized outcome of a completed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debrief {
    /// Agent codename entered at session start
    pub codename: String,
    /// The original goal statement
    pub goal: String,
    /// The fully finalized plan
    pub plan: Plan,
    /// When the session completed
    pub completed_at: DateTime<Utc>,
}

impl Debrief {
    /// Assemble the debrief from a completed plan
    pub fn new(codename: impl Into<String>, goal: impl Into<String>, plan: Plan) -> Self {
        let codename = codename.into();
        let goal = goal.into();
        debug!(%codename, goal_len = goal.len(), "Debrief::new: called");
        Self {
            codename,
            goal,
            plan,
            completed_at: Utc::now(),
        }
    }
}
