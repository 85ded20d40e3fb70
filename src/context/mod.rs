//! Context extraction
//!
//! Turns the live graph into small documents that can be attached to a
//! chat query: [`ContextSelector`] picks and bounds the nodes, the
//! [`formatter`] renders them as JSON or prompt text.

pub mod formatter;
pub mod selector;

pub use formatter::{from_json, to_json, to_text};
pub use selector::{ContextSelection, ContextSelector, ResolvedIds, SelectionRequest};
