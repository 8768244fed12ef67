//! # Event Payload Layouts
//!
//! The field order of every structured record kind. [`encode`] and
//! [`decode`] walk the same sequence; a change to one without the other
//! breaks every log written in between.
//!
//! Shared building blocks, in wire order:
//!
//! ```text
//! fields      message?, help_keyword?, sender_name?, timestamp, thread_id,
//!             context? (submission, node, [evaluation], project_instance,
//!                       project_context, target, task)
//! diagnostic  subcategory?, code?, file?, project_file?,
//!             line, column, end_line, end_column
//! message     fields, diagnostic, importance
//! extended    extended_type, metadata?, data?
//! ```
//!
//! Extended kinds write their base layout unchanged and append the extended
//! block, so a reader that only knows the base kind can still decode the
//! prefix and discard the rest.

pub mod decode;
pub mod encode;

pub use decode::EventDecoder;
pub use encode::EventEncoder;
