//! Path resolution over the document tree
//!
//! Navigates (and, when asked, creates) the container chain down to the
//! parent of a path's final segment. The container materialized for a missing
//! intermediate position is chosen by looking at the *next* segment: an index
//! segment means an array is needed, a field segment means an object.
//!
//! When a position holds a container of the wrong shape for the segment being
//! applied, the behavior is governed by [`ConflictPolicy`]: the default
//! `Replace` policy discards the subtree and substitutes a fresh empty
//! container of the required shape; `Strict` turns the same situation into a
//! validation error.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::limits::MAX_ARRAY_INDEX;
use crate::path::Segment;

/// What to do when a path segment meets a container of the wrong shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Replace the container with an empty one of the required shape,
    /// discarding its contents. Matches the historical update semantics.
    #[default]
    Replace,
    /// Fail the operation with a validation error instead of losing data.
    Strict,
}

/// Resolve the parent container and final segment for a path
///
/// With `create = true`, missing intermediate positions are materialized and
/// wrong-shaped containers are handled per `policy`. With `create = false`,
/// a missing position yields a missing-path error and a wrong-shaped
/// container yields a type-mismatch error regardless of policy.
///
/// The document root is always an object, so a path may not start with an
/// index segment; no policy coerces the root into an array.
///
/// The final segment is classified but never materialized here; writing (or
/// deleting) through it is the operation's job.
///
/// # Errors
///
/// Returns [`Error::Validation`] for empty paths, paths starting with an
/// index, missing positions (`create = false`), and type conflicts under
/// `Strict`.
pub fn resolve_parent<'doc, 'path>(
    root: &'doc mut Value,
    segments: &'path [Segment],
    create: bool,
    policy: ConflictPolicy,
) -> Result<(&'doc mut Value, &'path Segment)> {
    if matches!(segments.first(), Some(Segment::Index(_))) {
        return Err(Error::validation("Path cannot index the document root"));
    }

    let (last, inner) = segments
        .split_last()
        .ok_or_else(|| Error::validation("Path cannot be empty"))?;

    let mut current = root;
    for (i, segment) in inner.iter().enumerate() {
        let next = &segments[i + 1];
        current = descend(current, segment, next, create, policy)?;
    }

    Ok((current, last))
}

/// Step one segment deeper, materializing the child slot when permitted
fn descend<'a>(
    current: &'a mut Value,
    segment: &Segment,
    next: &Segment,
    create: bool,
    policy: ConflictPolicy,
) -> Result<&'a mut Value> {
    match segment {
        Segment::Field(key) => {
            if create {
                coerce_object(current, policy)?;
            } else if !current.is_object() {
                return Err(type_mismatch("object", current));
            }
            let obj = current
                .as_object_mut()
                .ok_or_else(|| type_mismatch("object", &Value::Null))?;

            if create {
                let slot = obj.entry(key.clone()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = empty_container(next);
                }
                Ok(slot)
            } else {
                match obj.get_mut(key) {
                    Some(slot) if !slot.is_null() => Ok(slot),
                    _ => Err(Error::validation(format!(
                        "Path segment not found: {}",
                        key
                    ))),
                }
            }
        }
        Segment::Index(idx) => {
            if create {
                coerce_array(current, policy)?;
            } else if !current.is_array() {
                return Err(type_mismatch("array", current));
            }
            let arr = current
                .as_array_mut()
                .ok_or_else(|| type_mismatch("array", &Value::Null))?;

            if create {
                check_index(*idx)?;
                while arr.len() <= *idx {
                    arr.push(Value::Null);
                }
                let slot = &mut arr[*idx];
                if slot.is_null() {
                    *slot = empty_container(next);
                }
                Ok(slot)
            } else {
                match arr.get_mut(*idx) {
                    Some(slot) if !slot.is_null() => Ok(slot),
                    _ => Err(Error::validation(format!("Path index not found: {}", idx))),
                }
            }
        }
    }
}

/// Empty container matching what the given segment needs to index into
fn empty_container(segment: &Segment) -> Value {
    if segment.is_index() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Make `value` an object, per the conflict policy
///
/// Null counts as absence and is always replaced; anything else is data and
/// only `Replace` may discard it.
pub(crate) fn coerce_object(value: &mut Value, policy: ConflictPolicy) -> Result<()> {
    if value.is_object() {
        return Ok(());
    }
    if !value.is_null() && policy == ConflictPolicy::Strict {
        return Err(type_mismatch("object", value));
    }
    *value = Value::Object(Map::new());
    Ok(())
}

/// Make `value` an array, per the conflict policy
pub(crate) fn coerce_array(value: &mut Value, policy: ConflictPolicy) -> Result<()> {
    if value.is_array() {
        return Ok(());
    }
    if !value.is_null() && policy == ConflictPolicy::Strict {
        return Err(type_mismatch("array", value));
    }
    *value = Value::Array(Vec::new());
    Ok(())
}

/// Bound on how far an array may be null-padded by one write
pub(crate) fn check_index(idx: usize) -> Result<()> {
    if idx > MAX_ARRAY_INDEX {
        return Err(Error::validation(format!(
            "array index {} exceeds maximum of {}",
            idx, MAX_ARRAY_INDEX
        )));
    }
    Ok(())
}

fn type_mismatch(expected: &str, found: &Value) -> Error {
    Error::validation(format!(
        "type mismatch: expected {}, found {}",
        expected,
        value_type_name(found)
    ))
}

/// Type name of a JSON value, for error messages
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
