//! Small enumerations carried inside event payloads.
//!
//! Each is persisted as its underlying integer; the ordinals are frozen the
//! same way [`crate::EventKind`] ordinals are.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Verbosity class of a message.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum MessageImportance {
    High = 0,
    Normal = 1,
    Low = 2,
}

/// Why a target was scheduled.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum TargetBuiltReason {
    None = 0,
    BeforeTargets = 1,
    DependsOn = 2,
    AfterTargets = 3,
    EntryTarget = 4,
    InitialTarget = 5,
    DefaultTarget = 6,
}

/// Why a target did not run.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum TargetSkipReason {
    None = 0,
    PreviouslyBuiltSuccessfully = 1,
    PreviouslyBuiltUnsuccessfully = 2,
    OutputsUpToDate = 3,
    ConditionWasFalse = 4,
}

/// Direction of a logged task parameter.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum TaskParameterKind {
    TaskInput = 0,
    TaskOutput = 1,
    AddItem = 2,
    RemoveItem = 3,
    SkippedTargetInputs = 4,
    SkippedTargetOutputs = 5,
}

/// Who asked the engine to load an assembly.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum AssemblyLoadContext {
    TaskRun = 0,
    Evaluation = 1,
    SdkResolution = 2,
    LoggerInitialization = 3,
}

impl Default for MessageImportance {
    fn default() -> Self {
        MessageImportance::Normal
    }
}

impl Default for TargetBuiltReason {
    fn default() -> Self {
        TargetBuiltReason::None
    }
}

impl Default for TargetSkipReason {
    fn default() -> Self {
        TargetSkipReason::None
    }
}

impl Default for TaskParameterKind {
    fn default() -> Self {
        TaskParameterKind::TaskInput
    }
}

impl Default for AssemblyLoadContext {
    fn default() -> Self {
        AssemblyLoadContext::TaskRun
    }
}
