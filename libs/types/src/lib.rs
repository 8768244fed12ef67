//! # Binary Build Log Types
//!
//! Pure data definitions for the binary build log: the record kind registry,
//! the build event variants and the small value types they are made of.
//!
//! ## Architecture Role
//!
//! ```text
//! binlog-types → [binlog-codec] → byte stream
//!      ↑               ↓
//! Event values    Writer/Reader
//! EventKind       Framing, versions
//! ```
//!
//! This crate does not know how events are laid out on the wire; field order,
//! version gates and framing all live in `binlog-codec`.
//!
//! ## Quick Start
//!
//! ```rust
//! use binlog_types::{BuildEvent, BuildEventContext, EventFields, TargetStarted, Timestamp};
//!
//! let event = BuildEvent::TargetStarted(TargetStarted {
//!     fields: EventFields::with_message("Target \"Build\" started.")
//!         .at(Timestamp::now())
//!         .in_context(BuildEventContext::new(0, 1, 2, 3, 4, -1)),
//!     target_name: Some("Build".to_string()),
//!     ..Default::default()
//! });
//! assert_eq!(event.kind().name(), "TargetStarted");
//! ```

pub mod context;
pub mod enums;
pub mod events;
pub mod kind;
pub mod timestamp;

pub use context::BuildEventContext;
pub use enums::{
    AssemblyLoadContext, MessageImportance, TargetBuiltReason, TargetSkipReason, TaskParameterKind,
};
pub use events::*;
pub use kind::EventKind;
pub use timestamp::Timestamp;
