//! Build event provenance.

use serde::{Deserialize, Serialize};

/// Identifies where in the build an event was raised.
///
/// Consumers correlate events through these ids (a target's messages share the
/// target id, a project's targets share the project context id, and so on). The
/// tuple is immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildEventContext {
    pub submission_id: i32,
    pub node_id: i32,
    /// Only carried by logs whose format version records evaluation ids.
    pub evaluation_id: i32,
    pub project_instance_id: i32,
    pub project_context_id: i32,
    pub target_id: i32,
    pub task_id: i32,
}

impl BuildEventContext {
    /// Marker for an id that does not apply to the event.
    pub const INVALID_ID: i32 = -1;

    /// Context with every id invalid.
    pub const INVALID: BuildEventContext = BuildEventContext {
        submission_id: Self::INVALID_ID,
        node_id: Self::INVALID_ID,
        evaluation_id: Self::INVALID_ID,
        project_instance_id: Self::INVALID_ID,
        project_context_id: Self::INVALID_ID,
        target_id: Self::INVALID_ID,
        task_id: Self::INVALID_ID,
    };

    /// Context for a project-level event with no evaluation, target or task.
    pub fn new(
        submission_id: i32,
        node_id: i32,
        project_instance_id: i32,
        project_context_id: i32,
        target_id: i32,
        task_id: i32,
    ) -> Self {
        Self {
            submission_id,
            node_id,
            evaluation_id: Self::INVALID_ID,
            project_instance_id,
            project_context_id,
            target_id,
            task_id,
        }
    }

    pub fn with_evaluation_id(mut self, evaluation_id: i32) -> Self {
        self.evaluation_id = evaluation_id;
        self
    }

    pub fn has_evaluation_id(&self) -> bool {
        self.evaluation_id != Self::INVALID_ID
    }
}

impl Default for BuildEventContext {
    fn default() -> Self {
        Self::INVALID
    }
}
