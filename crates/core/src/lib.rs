//! Core types for QuickStats
//!
//! This crate defines the document model and the patch machinery shared by
//! the rest of the workspace:
//! - Segment / parse_path: dotted paths into a statistics document
//! - resolve_parent: navigation and container creation along a path
//! - deep_merge: recursive object merge
//! - OpSpec / Op / apply_ops: the five patch operations
//! - Error: error type hierarchy
//! - Document limits: MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH, MAX_PATH_SEGMENTS
//!
//! The document itself is a `serde_json::Value` whose top level is always an
//! object keyed by statistic name.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod merge;
pub mod op;
pub mod path;
pub mod resolve;

pub use error::{Error, Result};
pub use limits::{
    nesting_depth, validate_document, MAX_ARRAY_INDEX, MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH,
    MAX_PATH_SEGMENTS,
};
pub use merge::deep_merge;
pub use op::{apply_op, apply_ops, Op, OpSpec};
pub use path::{parse_path, Segment};
pub use resolve::{resolve_parent, ConflictPolicy};
