//! Evaluation-time events: evaluation boundaries, imports, property tracking.

use super::fields::{EventFields, ItemGroup, Metadata, MessageEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectEvaluationStarted {
    pub fields: EventFields,
    pub project_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectEvaluationFinished {
    pub fields: EventFields,
    pub project_file: Option<String>,
    pub global_properties: Option<Metadata>,
    pub properties: Option<Metadata>,
    pub items: Vec<ItemGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectImported {
    pub message: MessageEvent,
    pub imported_project_file: Option<String>,
    pub unexpanded_project: Option<String>,
    pub import_ignored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyReassignment {
    pub message: MessageEvent,
    pub property_name: Option<String>,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UninitializedPropertyRead {
    pub message: MessageEvent,
    pub property_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyInitialValueSet {
    pub message: MessageEvent,
    pub property_name: Option<String>,
    pub property_value: Option<String>,
    pub property_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentVariableRead {
    pub message: MessageEvent,
    pub variable_name: Option<String>,
}
