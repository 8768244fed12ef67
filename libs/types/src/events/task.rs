//! Message-derived events raised while tasks run.

use super::fields::{MessageEvent, TaskItem};
use crate::enums::TaskParameterKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskCommandLine {
    pub message: MessageEvent,
    pub command_line: Option<String>,
    pub task_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskParameter {
    pub message: MessageEvent,
    pub kind: TaskParameterKind,
    pub item_type: Option<String>,
    pub items: Vec<TaskItem>,
    pub parameter_name: Option<String>,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseFileUsed {
    pub message: MessageEvent,
    pub response_file_path: Option<String>,
}
