//! # Build Event Model
//!
//! One variant per structured [`EventKind`]. Every event is a self-contained
//! immutable snapshot that owns all of its strings; nothing borrows from the
//! buffer it was decoded from.
//!
//! The terminator (`EndOfFile`) and blob kinds (`ProjectImportArchive`) have no
//! `BuildEvent` variant: they never carry an ordered field list.

pub mod evaluation;
pub mod fields;
pub mod lifecycle;
pub mod task;
pub mod telemetry;

pub use evaluation::*;
pub use fields::*;
pub use lifecycle::*;
pub use task::*;
pub use telemetry::*;

use crate::context::BuildEventContext;
use crate::kind::EventKind;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildEvent {
    BuildStarted(BuildStarted),
    BuildFinished(BuildFinished),
    ProjectStarted(ProjectStarted),
    ProjectFinished(ProjectFinished),
    TargetStarted(TargetStarted),
    TargetFinished(TargetFinished),
    TaskStarted(TaskStarted),
    TaskFinished(TaskFinished),
    Error(DiagnosticEvent),
    Warning(DiagnosticEvent),
    Message(MessageEvent),
    TaskCommandLine(TaskCommandLine),
    CriticalMessage(MessageEvent),
    ProjectEvaluationStarted(ProjectEvaluationStarted),
    ProjectEvaluationFinished(ProjectEvaluationFinished),
    ProjectImported(ProjectImported),
    TargetSkipped(TargetSkipped),
    PropertyReassignment(PropertyReassignment),
    UninitializedPropertyRead(UninitializedPropertyRead),
    EnvironmentVariableRead(EnvironmentVariableRead),
    PropertyInitialValueSet(PropertyInitialValueSet),
    TaskParameter(TaskParameter),
    ResponseFileUsed(ResponseFileUsed),
    AssemblyLoad(AssemblyLoad),
    BuildCheckMessage(MessageEvent),
    BuildCheckWarning(DiagnosticEvent),
    BuildCheckError(DiagnosticEvent),
    BuildCheckTracing(BuildCheckTracing),
    BuildCheckAcquisition(BuildCheckAcquisition),
    BuildSubmissionStarted(BuildSubmissionStarted),
    BuildCanceled(BuildCanceled),
    ExtendedError(ExtendedDiagnostic),
    ExtendedWarning(ExtendedDiagnostic),
    ExtendedMessage(ExtendedMessage),
    ExtendedCriticalMessage(ExtendedMessage),
    ExtendedCustom(ExtendedCustom),
}

impl BuildEvent {
    /// Record kind this event is written under.
    pub fn kind(&self) -> EventKind {
        match self {
            BuildEvent::BuildStarted(_) => EventKind::BuildStarted,
            BuildEvent::BuildFinished(_) => EventKind::BuildFinished,
            BuildEvent::ProjectStarted(_) => EventKind::ProjectStarted,
            BuildEvent::ProjectFinished(_) => EventKind::ProjectFinished,
            BuildEvent::TargetStarted(_) => EventKind::TargetStarted,
            BuildEvent::TargetFinished(_) => EventKind::TargetFinished,
            BuildEvent::TaskStarted(_) => EventKind::TaskStarted,
            BuildEvent::TaskFinished(_) => EventKind::TaskFinished,
            BuildEvent::Error(_) => EventKind::Error,
            BuildEvent::Warning(_) => EventKind::Warning,
            BuildEvent::Message(_) => EventKind::Message,
            BuildEvent::TaskCommandLine(_) => EventKind::TaskCommandLine,
            BuildEvent::CriticalMessage(_) => EventKind::CriticalMessage,
            BuildEvent::ProjectEvaluationStarted(_) => EventKind::ProjectEvaluationStarted,
            BuildEvent::ProjectEvaluationFinished(_) => EventKind::ProjectEvaluationFinished,
            BuildEvent::ProjectImported(_) => EventKind::ProjectImported,
            BuildEvent::TargetSkipped(_) => EventKind::TargetSkipped,
            BuildEvent::PropertyReassignment(_) => EventKind::PropertyReassignment,
            BuildEvent::UninitializedPropertyRead(_) => EventKind::UninitializedPropertyRead,
            BuildEvent::EnvironmentVariableRead(_) => EventKind::EnvironmentVariableRead,
            BuildEvent::PropertyInitialValueSet(_) => EventKind::PropertyInitialValueSet,
            BuildEvent::TaskParameter(_) => EventKind::TaskParameter,
            BuildEvent::ResponseFileUsed(_) => EventKind::ResponseFileUsed,
            BuildEvent::AssemblyLoad(_) => EventKind::AssemblyLoad,
            BuildEvent::BuildCheckMessage(_) => EventKind::BuildCheckMessage,
            BuildEvent::BuildCheckWarning(_) => EventKind::BuildCheckWarning,
            BuildEvent::BuildCheckError(_) => EventKind::BuildCheckError,
            BuildEvent::BuildCheckTracing(_) => EventKind::BuildCheckTracing,
            BuildEvent::BuildCheckAcquisition(_) => EventKind::BuildCheckAcquisition,
            BuildEvent::BuildSubmissionStarted(_) => EventKind::BuildSubmissionStarted,
            BuildEvent::BuildCanceled(_) => EventKind::BuildCanceled,
            BuildEvent::ExtendedError(_) => EventKind::ExtendedError,
            BuildEvent::ExtendedWarning(_) => EventKind::ExtendedWarning,
            BuildEvent::ExtendedMessage(_) => EventKind::ExtendedMessage,
            BuildEvent::ExtendedCriticalMessage(_) => EventKind::ExtendedCriticalMessage,
            BuildEvent::ExtendedCustom(_) => EventKind::ExtendedCustom,
        }
    }

    /// The common field block every variant starts with.
    pub fn fields(&self) -> &EventFields {
        match self {
            BuildEvent::BuildStarted(e) => &e.fields,
            BuildEvent::BuildFinished(e) => &e.fields,
            BuildEvent::ProjectStarted(e) => &e.fields,
            BuildEvent::ProjectFinished(e) => &e.fields,
            BuildEvent::TargetStarted(e) => &e.fields,
            BuildEvent::TargetFinished(e) => &e.fields,
            BuildEvent::TaskStarted(e) => &e.fields,
            BuildEvent::TaskFinished(e) => &e.fields,
            BuildEvent::Error(e)
            | BuildEvent::Warning(e)
            | BuildEvent::BuildCheckWarning(e)
            | BuildEvent::BuildCheckError(e) => &e.fields,
            BuildEvent::Message(e)
            | BuildEvent::CriticalMessage(e)
            | BuildEvent::BuildCheckMessage(e) => &e.fields,
            BuildEvent::TaskCommandLine(e) => &e.message.fields,
            BuildEvent::ProjectEvaluationStarted(e) => &e.fields,
            BuildEvent::ProjectEvaluationFinished(e) => &e.fields,
            BuildEvent::ProjectImported(e) => &e.message.fields,
            BuildEvent::TargetSkipped(e) => &e.fields,
            BuildEvent::PropertyReassignment(e) => &e.message.fields,
            BuildEvent::UninitializedPropertyRead(e) => &e.message.fields,
            BuildEvent::EnvironmentVariableRead(e) => &e.message.fields,
            BuildEvent::PropertyInitialValueSet(e) => &e.message.fields,
            BuildEvent::TaskParameter(e) => &e.message.fields,
            BuildEvent::ResponseFileUsed(e) => &e.message.fields,
            BuildEvent::AssemblyLoad(e) => &e.fields,
            BuildEvent::BuildCheckTracing(e) => &e.fields,
            BuildEvent::BuildCheckAcquisition(e) => &e.fields,
            BuildEvent::BuildSubmissionStarted(e) => &e.fields,
            BuildEvent::BuildCanceled(e) => &e.fields,
            BuildEvent::ExtendedError(e) | BuildEvent::ExtendedWarning(e) => &e.base.fields,
            BuildEvent::ExtendedMessage(e) | BuildEvent::ExtendedCriticalMessage(e) => {
                &e.base.fields
            }
            BuildEvent::ExtendedCustom(e) => &e.fields,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.fields().message.as_deref()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.fields().timestamp
    }

    pub fn context(&self) -> Option<&BuildEventContext> {
        self.fields().context.as_ref()
    }

    /// Extended block, for extended kinds only.
    pub fn extended_data(&self) -> Option<&ExtendedData> {
        match self {
            BuildEvent::ExtendedError(e) | BuildEvent::ExtendedWarning(e) => Some(&e.extended),
            BuildEvent::ExtendedMessage(e) | BuildEvent::ExtendedCriticalMessage(e) => {
                Some(&e.extended)
            }
            BuildEvent::ExtendedCustom(e) => Some(&e.extended),
            _ => None,
        }
    }
}
