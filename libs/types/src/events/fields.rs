//! Field blocks shared between event variants.
//!
//! Most events are a [`EventFields`] block plus a few variant-specific fields.
//! Diagnostics add [`DiagnosticFields`], messages add an importance on top of
//! that, and extended events append an [`ExtendedData`] block to their base.

use crate::context::BuildEventContext;
use crate::enums::MessageImportance;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form string mapping with unique keys and no ordering contract.
pub type Metadata = BTreeMap<String, String>;

/// Fields carried by (almost) every event.
///
/// `None` and `Some(String::new())` are different values and survive a round
/// trip through the log as such.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventFields {
    pub message: Option<String>,
    pub help_keyword: Option<String>,
    pub sender_name: Option<String>,
    pub timestamp: Timestamp,
    pub context: Option<BuildEventContext>,
    pub thread_id: i32,
}

impl EventFields {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn sender(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = Some(sender_name.into());
        self
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn in_context(mut self, context: BuildEventContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Source location and classification of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticFields {
    pub subcategory: Option<String>,
    pub code: Option<String>,
    pub file: Option<String>,
    pub project_file: Option<String>,
    pub line_number: i32,
    pub column_number: i32,
    pub end_line_number: i32,
    pub end_column_number: i32,
}

/// Error and warning shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub fields: EventFields,
    pub diagnostic: DiagnosticFields,
}

/// Message shape; also the prefix of every message-derived event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageEvent {
    pub fields: EventFields,
    pub diagnostic: DiagnosticFields,
    pub importance: MessageImportance,
}

impl MessageEvent {
    pub fn new(message: impl Into<String>, importance: MessageImportance) -> Self {
        Self {
            fields: EventFields::with_message(message),
            diagnostic: DiagnosticFields::default(),
            importance,
        }
    }
}

/// Trailing block of an extended event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedData {
    pub extended_type: String,
    pub metadata: Option<Metadata>,
    pub data: Option<String>,
}

/// An item as logged by targets and tasks: an item spec plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskItem {
    pub item_spec: String,
    pub metadata: Metadata,
}

impl TaskItem {
    pub fn new(item_spec: impl Into<String>) -> Self {
        Self {
            item_spec: item_spec.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }
}

/// All items of one item type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemGroup {
    pub item_type: String,
    pub items: Vec<TaskItem>,
}
