//! # Event Kind Registry
//!
//! ## Purpose
//!
//! Central registry of every record kind that can appear in a binary build log.
//! The numeric tag of each kind is written in front of every record, so the
//! values below are frozen: new kinds are appended at the end and retired
//! ordinals stay reserved forever.
//!
//! ## Type Organization
//!
//! - **Terminator (0)**: `EndOfFile`, a zero-length record closing the stream
//! - **Lifecycle (1-8)**: build, project, target and task start/finish pairs
//! - **Diagnostics (9-13)**: errors, warnings, messages and command lines
//! - **Evaluation (14-22)**: evaluation, imports, properties, environment reads
//! - **Reserved (23-24)**: never emitted, always decoded as unknown
//! - **Task/telemetry (25-34)**: task parameters, assembly loads, build checks
//! - **Extended (35-39)**: base shapes followed by free-form metadata
//!
//! `ProjectImportArchive` is the only blob kind: its payload is opaque bytes.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Record tag identifying which event variant a record payload encodes.
#[repr(u32)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
pub enum EventKind {
    EndOfFile = 0,
    BuildStarted = 1,
    BuildFinished = 2,
    ProjectStarted = 3,
    ProjectFinished = 4,
    TargetStarted = 5,
    TargetFinished = 6,
    TaskStarted = 7,
    TaskFinished = 8,
    Error = 9,
    Warning = 10,
    Message = 11,
    TaskCommandLine = 12,
    CriticalMessage = 13,
    ProjectEvaluationStarted = 14,
    ProjectEvaluationFinished = 15,
    ProjectImported = 16,
    ProjectImportArchive = 17,
    TargetSkipped = 18,
    PropertyReassignment = 19,
    UninitializedPropertyRead = 20,
    EnvironmentVariableRead = 21,
    PropertyInitialValueSet = 22,
    // 23 and 24 are reserved.
    TaskParameter = 25,
    ResponseFileUsed = 26,
    AssemblyLoad = 27,
    BuildCheckMessage = 28,
    BuildCheckWarning = 29,
    BuildCheckError = 30,
    BuildCheckTracing = 31,
    BuildCheckAcquisition = 32,
    BuildSubmissionStarted = 33,
    BuildCanceled = 34,
    ExtendedError = 35,
    ExtendedWarning = 36,
    ExtendedMessage = 37,
    ExtendedCriticalMessage = 38,
    ExtendedCustom = 39,
}

impl EventKind {
    /// Every registered kind in ordinal order.
    pub const ALL: [EventKind; 38] = [
        EventKind::EndOfFile,
        EventKind::BuildStarted,
        EventKind::BuildFinished,
        EventKind::ProjectStarted,
        EventKind::ProjectFinished,
        EventKind::TargetStarted,
        EventKind::TargetFinished,
        EventKind::TaskStarted,
        EventKind::TaskFinished,
        EventKind::Error,
        EventKind::Warning,
        EventKind::Message,
        EventKind::TaskCommandLine,
        EventKind::CriticalMessage,
        EventKind::ProjectEvaluationStarted,
        EventKind::ProjectEvaluationFinished,
        EventKind::ProjectImported,
        EventKind::ProjectImportArchive,
        EventKind::TargetSkipped,
        EventKind::PropertyReassignment,
        EventKind::UninitializedPropertyRead,
        EventKind::EnvironmentVariableRead,
        EventKind::PropertyInitialValueSet,
        EventKind::TaskParameter,
        EventKind::ResponseFileUsed,
        EventKind::AssemblyLoad,
        EventKind::BuildCheckMessage,
        EventKind::BuildCheckWarning,
        EventKind::BuildCheckError,
        EventKind::BuildCheckTracing,
        EventKind::BuildCheckAcquisition,
        EventKind::BuildSubmissionStarted,
        EventKind::BuildCanceled,
        EventKind::ExtendedError,
        EventKind::ExtendedWarning,
        EventKind::ExtendedMessage,
        EventKind::ExtendedCriticalMessage,
        EventKind::ExtendedCustom,
    ];

    /// Wire ordinal of this kind.
    #[inline]
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::EndOfFile => "EndOfFile",
            EventKind::BuildStarted => "BuildStarted",
            EventKind::BuildFinished => "BuildFinished",
            EventKind::ProjectStarted => "ProjectStarted",
            EventKind::ProjectFinished => "ProjectFinished",
            EventKind::TargetStarted => "TargetStarted",
            EventKind::TargetFinished => "TargetFinished",
            EventKind::TaskStarted => "TaskStarted",
            EventKind::TaskFinished => "TaskFinished",
            EventKind::Error => "Error",
            EventKind::Warning => "Warning",
            EventKind::Message => "Message",
            EventKind::TaskCommandLine => "TaskCommandLine",
            EventKind::CriticalMessage => "CriticalMessage",
            EventKind::ProjectEvaluationStarted => "ProjectEvaluationStarted",
            EventKind::ProjectEvaluationFinished => "ProjectEvaluationFinished",
            EventKind::ProjectImported => "ProjectImported",
            EventKind::ProjectImportArchive => "ProjectImportArchive",
            EventKind::TargetSkipped => "TargetSkipped",
            EventKind::PropertyReassignment => "PropertyReassignment",
            EventKind::UninitializedPropertyRead => "UninitializedPropertyRead",
            EventKind::EnvironmentVariableRead => "EnvironmentVariableRead",
            EventKind::PropertyInitialValueSet => "PropertyInitialValueSet",
            EventKind::TaskParameter => "TaskParameter",
            EventKind::ResponseFileUsed => "ResponseFileUsed",
            EventKind::AssemblyLoad => "AssemblyLoad",
            EventKind::BuildCheckMessage => "BuildCheckMessage",
            EventKind::BuildCheckWarning => "BuildCheckWarning",
            EventKind::BuildCheckError => "BuildCheckError",
            EventKind::BuildCheckTracing => "BuildCheckTracing",
            EventKind::BuildCheckAcquisition => "BuildCheckAcquisition",
            EventKind::BuildSubmissionStarted => "BuildSubmissionStarted",
            EventKind::BuildCanceled => "BuildCanceled",
            EventKind::ExtendedError => "ExtendedError",
            EventKind::ExtendedWarning => "ExtendedWarning",
            EventKind::ExtendedMessage => "ExtendedMessage",
            EventKind::ExtendedCriticalMessage => "ExtendedCriticalMessage",
            EventKind::ExtendedCustom => "ExtendedCustom",
        }
    }

    /// Blob records carry raw bytes instead of an ordered field list.
    #[inline]
    pub fn is_blob(self) -> bool {
        matches!(self, EventKind::ProjectImportArchive)
    }

    /// Extended kinds append extended-type, metadata and data to a base shape.
    #[inline]
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            EventKind::ExtendedError
                | EventKind::ExtendedWarning
                | EventKind::ExtendedMessage
                | EventKind::ExtendedCriticalMessage
                | EventKind::ExtendedCustom
        )
    }

    /// The base kind whose field sequence an extended kind starts with.
    ///
    /// `ExtendedCustom` has no standalone base record; it starts with the
    /// common event fields only.
    pub fn base_kind(self) -> Option<EventKind> {
        match self {
            EventKind::ExtendedError => Some(EventKind::Error),
            EventKind::ExtendedWarning => Some(EventKind::Warning),
            EventKind::ExtendedMessage => Some(EventKind::Message),
            EventKind::ExtendedCriticalMessage => Some(EventKind::CriticalMessage),
            _ => None,
        }
    }

    /// First log format version allowed to carry this kind.
    pub fn introduced_in(self) -> u32 {
        match self {
            EventKind::EndOfFile
            | EventKind::BuildStarted
            | EventKind::BuildFinished
            | EventKind::ProjectStarted
            | EventKind::ProjectFinished
            | EventKind::TargetStarted
            | EventKind::TargetFinished
            | EventKind::TaskStarted
            | EventKind::TaskFinished
            | EventKind::Error
            | EventKind::Warning
            | EventKind::Message
            | EventKind::TaskCommandLine
            | EventKind::CriticalMessage => 1,
            EventKind::ProjectEvaluationStarted | EventKind::ProjectEvaluationFinished => 2,
            EventKind::ProjectImported
            | EventKind::ProjectImportArchive
            | EventKind::TargetSkipped => 3,
            EventKind::PropertyReassignment
            | EventKind::UninitializedPropertyRead
            | EventKind::EnvironmentVariableRead
            | EventKind::PropertyInitialValueSet => 4,
            EventKind::TaskParameter => 9,
            EventKind::ResponseFileUsed => 12,
            EventKind::AssemblyLoad => 13,
            EventKind::BuildCheckMessage
            | EventKind::BuildCheckWarning
            | EventKind::BuildCheckError
            | EventKind::BuildCheckTracing
            | EventKind::BuildCheckAcquisition => 17,
            EventKind::BuildSubmissionStarted => 18,
            EventKind::BuildCanceled => 19,
            EventKind::ExtendedError
            | EventKind::ExtendedWarning
            | EventKind::ExtendedMessage
            | EventKind::ExtendedCriticalMessage
            | EventKind::ExtendedCustom => 20,
        }
    }

    /// Look up a kind by wire ordinal; `None` for reserved or future ordinals.
    #[inline]
    pub fn from_ordinal(ordinal: u32) -> Option<EventKind> {
        EventKind::try_from(ordinal).ok()
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
