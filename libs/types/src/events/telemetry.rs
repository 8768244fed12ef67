//! Engine telemetry events and extended (metadata-carrying) events.

use super::fields::{DiagnosticEvent, EventFields, ExtendedData, MessageEvent};
use crate::enums::AssemblyLoadContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblyLoad {
    pub fields: EventFields,
    pub loading_context: AssemblyLoadContext,
    pub loading_initiator: Option<String>,
    pub assembly_name: Option<String>,
    pub assembly_path: Option<String>,
    /// Module version id, persisted as 16 raw bytes.
    pub mvid: [u8; 16],
    pub app_domain_name: Option<String>,
}

/// Time spent per build-check rule, in timestamp ticks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildCheckTracing {
    pub fields: EventFields,
    pub tracing_data: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildCheckAcquisition {
    pub fields: EventFields,
    pub acquisition_path: Option<String>,
    pub project_path: Option<String>,
}

/// Extended error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedDiagnostic {
    pub base: DiagnosticEvent,
    pub extended: ExtendedData,
}

/// Extended message or critical message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedMessage {
    pub base: MessageEvent,
    pub extended: ExtendedData,
}

/// Custom event whose only structure is the extended block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedCustom {
    pub fields: EventFields,
    pub extended: ExtendedData,
}
