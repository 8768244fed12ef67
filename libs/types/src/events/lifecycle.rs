//! Build, submission, project, target and task lifecycle events.

use super::fields::{EventFields, ItemGroup, Metadata, TaskItem};
use crate::context::BuildEventContext;
use crate::enums::{TargetBuiltReason, TargetSkipReason};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildStarted {
    pub fields: EventFields,
    /// Process environment at build start. Writers only persist it when
    /// configured to log all environment variables.
    pub environment: Option<Metadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildFinished {
    pub fields: EventFields,
    pub succeeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildCanceled {
    pub fields: EventFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildSubmissionStarted {
    pub fields: EventFields,
    pub submission_id: i32,
    pub entry_project_paths: Vec<String>,
    pub target_names: Vec<String>,
    pub global_properties: Metadata,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectStarted {
    pub fields: EventFields,
    pub project_id: i32,
    pub project_file: Option<String>,
    pub target_names: Option<String>,
    pub tools_version: Option<String>,
    pub parent_context: Option<BuildEventContext>,
    pub global_properties: Option<Metadata>,
    pub properties: Option<Metadata>,
    pub items: Vec<ItemGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectFinished {
    pub fields: EventFields,
    pub project_file: Option<String>,
    pub succeeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetStarted {
    pub fields: EventFields,
    pub target_name: Option<String>,
    pub project_file: Option<String>,
    pub target_file: Option<String>,
    pub parent_target: Option<String>,
    pub build_reason: TargetBuiltReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetFinished {
    pub fields: EventFields,
    pub target_name: Option<String>,
    pub project_file: Option<String>,
    pub target_file: Option<String>,
    pub succeeded: bool,
    pub target_outputs: Vec<TaskItem>,
}

/// A target that was not executed.
///
/// The condition, outcome and skip-reason fields only exist in logs whose
/// format version records skip details; older logs decode them as defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetSkipped {
    pub fields: EventFields,
    pub target_name: Option<String>,
    pub project_file: Option<String>,
    pub target_file: Option<String>,
    pub parent_target: Option<String>,
    pub build_reason: TargetBuiltReason,
    pub condition: Option<String>,
    pub evaluated_condition: Option<String>,
    pub originally_succeeded: bool,
    pub skip_reason: TargetSkipReason,
    pub original_context: Option<BuildEventContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStarted {
    pub fields: EventFields,
    pub task_name: Option<String>,
    pub project_file: Option<String>,
    pub task_file: Option<String>,
    pub line_number: i32,
    pub column_number: i32,
    pub task_assembly_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFinished {
    pub fields: EventFields,
    pub task_name: Option<String>,
    pub project_file: Option<String>,
    pub task_file: Option<String>,
    pub succeeded: bool,
}
