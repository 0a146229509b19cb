//! Patch operations
//!
//! Operations arrive on the wire as loose [`OpSpec`] records (everything
//! optional, exactly as the JSON payload allows) and are validated into typed
//! [`Op`] values one at a time while the batch is applied. Validating per-op
//! keeps the failure semantics of the batch: earlier operations have already
//! mutated the in-memory document when a later one turns out to be invalid,
//! and the caller is expected to discard the whole document in that case.
//!
//! | Op | Effect |
//! |----|--------|
//! | `set` | write the value at the path, padding arrays with nulls |
//! | `inc` | add `by` (default 1) to a numeric slot, missing counts as 0 |
//! | `delete` | remove the key / array element, missing targets are a no-op |
//! | `merge` | deep-merge an object payload into the slot |
//! | `append` | push onto an array slot, wrapping a non-array current value |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::merge::deep_merge;
use crate::path::{parse_path, Segment};
use crate::resolve::{check_index, coerce_array, coerce_object, resolve_parent, ConflictPolicy};

/// A patch operation as it appears on the wire
///
/// All fields are optional at this layer; [`Op::from_spec`] decides what is
/// required for each kind and reports violations as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpSpec {
    /// Operation kind: `set`, `inc`, `delete`, `merge`, or `append`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,
    /// Dot-delimited target path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Payload value (required for set/merge, optional for append)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Increment amount for `inc` (default 1); held loose and checked for
    /// numberness during validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<Value>,
}

impl OpSpec {
    fn new(op: &str, path: &str) -> Self {
        OpSpec {
            op: Some(op.to_string()),
            path: Some(path.to_string()),
            value: None,
            by: None,
        }
    }

    /// Build a `set` operation
    pub fn set(path: &str, value: Value) -> Self {
        OpSpec {
            value: Some(value),
            ..OpSpec::new("set", path)
        }
    }

    /// Build an `inc` operation with the default step of 1
    pub fn inc(path: &str) -> Self {
        OpSpec::new("inc", path)
    }

    /// Build an `inc` operation with an explicit step
    pub fn inc_by(path: &str, by: impl Into<Number>) -> Self {
        OpSpec {
            by: Some(Value::Number(by.into())),
            ..OpSpec::new("inc", path)
        }
    }

    /// Build a `delete` operation
    pub fn delete(path: &str) -> Self {
        OpSpec::new("delete", path)
    }

    /// Build a `merge` operation
    pub fn merge(path: &str, value: Value) -> Self {
        OpSpec {
            value: Some(value),
            ..OpSpec::new("merge", path)
        }
    }

    /// Build an `append` operation
    pub fn append(path: &str, value: Value) -> Self {
        OpSpec {
            value: Some(value),
            ..OpSpec::new("append", path)
        }
    }
}

/// A validated patch operation with a parsed path
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Write a value at the path
    Set {
        /// Target path
        path: Vec<Segment>,
        /// Value to write
        value: Value,
    },
    /// Add to a numeric value at the path
    Inc {
        /// Target path
        path: Vec<Segment>,
        /// Increment amount
        by: Number,
    },
    /// Remove the value at the path
    Delete {
        /// Target path
        path: Vec<Segment>,
    },
    /// Deep-merge an object into the value at the path
    Merge {
        /// Target path
        path: Vec<Segment>,
        /// Object to merge in
        value: Map<String, Value>,
    },
    /// Append a value to the array at the path
    Append {
        /// Target path
        path: Vec<Segment>,
        /// Value to append
        value: Value,
    },
}

impl Op {
    /// Validate a wire-level spec into a typed operation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for unknown kinds, missing or invalid
    /// paths, missing `set`/`merge` payloads, and non-object `merge`
    /// payloads.
    pub fn from_spec(spec: &OpSpec) -> Result<Op> {
        let kind = spec.op.as_deref().unwrap_or_default();
        if !matches!(kind, "set" | "inc" | "delete" | "merge" | "append") {
            return Err(Error::validation(format!("Unknown op: {:?}", kind)));
        }

        let path = parse_path(spec.path.as_deref().unwrap_or_default())?;

        match kind {
            "set" => {
                let value = spec
                    .value
                    .clone()
                    .ok_or_else(|| Error::validation("set op requires 'value'"))?;
                Ok(Op::Set { path, value })
            }
            "inc" => {
                let by = match &spec.by {
                    None => Number::from(1),
                    Some(Value::Number(n)) => n.clone(),
                    Some(_) => return Err(Error::validation("inc 'by' must be a number")),
                };
                Ok(Op::Inc { path, by })
            }
            "delete" => Ok(Op::Delete { path }),
            "merge" => match spec.value.clone() {
                Some(Value::Object(value)) => Ok(Op::Merge { path, value }),
                _ => Err(Error::validation("merge 'value' must be an object")),
            },
            "append" => {
                let value = spec.value.clone().unwrap_or(Value::Null);
                Ok(Op::Append { path, value })
            }
            _ => unreachable!("kind checked above"),
        }
    }
}

/// Apply a batch of wire operations to a document, in order
///
/// The first failure aborts the batch. The document may already carry the
/// effects of earlier operations at that point; callers must treat the whole
/// document as discarded on error.
///
/// # Errors
///
/// Propagates validation errors from spec conversion and from the individual
/// operations.
pub fn apply_ops(doc: &mut Value, specs: &[OpSpec], policy: ConflictPolicy) -> Result<()> {
    for spec in specs {
        let op = Op::from_spec(spec)?;
        apply_op(doc, &op, policy)?;
    }
    Ok(())
}

/// Apply one operation to a document
///
/// # Errors
///
/// Returns [`Error::Validation`] for non-numeric `inc` targets and for type
/// conflicts under [`ConflictPolicy::Strict`].
pub fn apply_op(doc: &mut Value, op: &Op, policy: ConflictPolicy) -> Result<()> {
    match op {
        Op::Set { path, value } => {
            let (parent, last) = resolve_parent(doc, path, true, policy)?;
            write_slot(parent, last, value.clone(), policy)
        }
        Op::Inc { path, by } => {
            let (parent, last) = resolve_parent(doc, path, true, policy)?;
            let current = match read_slot(parent, last) {
                None | Some(Value::Null) => Number::from(0),
                Some(Value::Number(n)) => n.clone(),
                Some(_) => return Err(Error::validation("inc target is not numeric")),
            };
            let sum = add_numbers(&current, by)?;
            write_slot(parent, last, Value::Number(sum), policy)
        }
        Op::Delete { path } => {
            let (parent, last) = resolve_parent(doc, path, true, policy)?;
            delete_slot(parent, last);
            Ok(())
        }
        Op::Merge { path, value } => {
            let (parent, last) = resolve_parent(doc, path, true, policy)?;
            // A non-object current value is discarded and merged into fresh.
            let mut current = match take_slot(parent, last) {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            deep_merge(&mut current, value.clone());
            write_slot(parent, last, Value::Object(current), policy)
        }
        Op::Append { path, value } => {
            let (parent, last) = resolve_parent(doc, path, true, policy)?;
            let mut items = match take_slot(parent, last) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                // Existing scalar/object becomes the sole first element.
                Some(other) => vec![other],
            };
            items.push(value.clone());
            write_slot(parent, last, Value::Array(items), policy)
        }
    }
}

/// Read the value at the final slot, if present
fn read_slot<'a>(parent: &'a Value, last: &Segment) -> Option<&'a Value> {
    match (parent, last) {
        (Value::Object(obj), Segment::Field(key)) => obj.get(key),
        (Value::Array(arr), Segment::Index(idx)) => arr.get(*idx),
        _ => None,
    }
}

/// Remove and return the value at the final slot
///
/// Array slots are replaced with null rather than shifted, so an immediately
/// following write lands at the same index.
fn take_slot(parent: &mut Value, last: &Segment) -> Option<Value> {
    match (parent, last) {
        (Value::Object(obj), Segment::Field(key)) => obj.remove(key),
        (Value::Array(arr), Segment::Index(idx)) => arr
            .get_mut(*idx)
            .map(std::mem::take)
            .filter(|v| !v.is_null()),
        _ => None,
    }
}

/// Write a value at the final slot, coercing the parent shape per policy
///
/// Arrays are padded with nulls up to the target index.
fn write_slot(parent: &mut Value, last: &Segment, value: Value, policy: ConflictPolicy) -> Result<()> {
    match last {
        Segment::Field(key) => {
            coerce_object(parent, policy)?;
            if let Some(obj) = parent.as_object_mut() {
                obj.insert(key.clone(), value);
            }
        }
        Segment::Index(idx) => {
            check_index(*idx)?;
            coerce_array(parent, policy)?;
            if let Some(arr) = parent.as_array_mut() {
                while arr.len() <= *idx {
                    arr.push(Value::Null);
                }
                arr[*idx] = value;
            }
        }
    }
    Ok(())
}

/// Remove the value at the final slot; a no-op when nothing is there
///
/// Array deletion shifts subsequent elements left.
fn delete_slot(parent: &mut Value, last: &Segment) {
    match (parent, last) {
        (Value::Object(obj), Segment::Field(key)) => {
            obj.remove(key);
        }
        (Value::Array(arr), Segment::Index(idx)) => {
            if *idx < arr.len() {
                arr.remove(*idx);
            }
        }
        _ => {}
    }
}

/// Add two JSON numbers, staying in integer arithmetic when possible
fn add_numbers(current: &Number, by: &Number) -> Result<Number> {
    if let (Some(a), Some(b)) = (current.as_i64(), by.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Number::from(sum));
        }
    } else if let (Some(a), Some(b)) = (current.as_u64(), by.as_u64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Number::from(sum));
        }
    }

    let (Some(a), Some(b)) = (current.as_f64(), by.as_f64()) else {
        return Err(Error::validation("inc target is not numeric"));
    };
    Number::from_f64(a + b)
        .ok_or_else(|| Error::validation("inc produced a non-finite number"))
}
