//! Document size limits
//!
//! Guards checked before a mutated document is persisted, preventing a patch
//! batch from growing a stats blob past what the store (and the readers of
//! these documents) can reasonably handle.
//!
//! | Limit | Value | Constant |
//! |-------|-------|----------|
//! | Max document size | 16 MB | [`MAX_DOCUMENT_SIZE`] |
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//! | Max path length | 256 segments | [`MAX_PATH_SEGMENTS`] |
//! | Max array index | 10,000 | [`MAX_ARRAY_INDEX`] |

use serde_json::Value;

use crate::error::{Error, Result};

/// Maximum serialized document size in bytes (16 MB)
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Maximum nesting depth of a document (100 levels)
pub const MAX_NESTING_DEPTH: usize = 100;

/// Maximum number of segments in a single path (256 segments)
pub const MAX_PATH_SEGMENTS: usize = 256;

/// Maximum array index a path may address (10,000)
///
/// Writing at index `n` null-pads the array up to `n`, so the index bound is
/// what keeps one operation from allocating an enormous array before the
/// document-size check can run.
pub const MAX_ARRAY_INDEX: usize = 10_000;

/// Calculate the maximum nesting depth of a JSON value
///
/// Scalars have depth 0; each enclosing object or array adds one level.
pub fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => 0,
        Value::Array(arr) => 1 + arr.iter().map(nesting_depth).max().unwrap_or(0),
        Value::Object(obj) => 1 + obj.values().map(nesting_depth).max().unwrap_or(0),
    }
}

/// Validate a document against size and depth limits
///
/// The size check uses the compact JSON representation, which is also what
/// gets written to the store.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the violated limit.
pub fn validate_document(doc: &Value) -> Result<()> {
    let size = doc.to_string().len();
    if size > MAX_DOCUMENT_SIZE {
        return Err(Error::validation(format!(
            "document size {} exceeds maximum of {} bytes",
            size, MAX_DOCUMENT_SIZE
        )));
    }

    let depth = nesting_depth(doc);
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::validation(format!(
            "document nesting depth {} exceeds maximum of {} levels",
            depth, MAX_NESTING_DEPTH
        )));
    }

    Ok(())
}
