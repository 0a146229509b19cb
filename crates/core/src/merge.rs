//! Recursive object merge
//!
//! Only object values merge key-by-key; arrays and scalars from the source
//! overwrite whatever the destination held, including changing its type.

use serde_json::{Map, Value};

/// Deep-merge `src` into `dst`
///
/// For each key in `src`: when both sides hold objects the merge recurses,
/// otherwise the source value replaces the destination value. Arrays are
/// never merged element-wise.
pub fn deep_merge(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, incoming) in src {
        match (dst.remove(&key), incoming) {
            (Some(Value::Object(mut existing)), Value::Object(nested)) => {
                deep_merge(&mut existing, nested);
                dst.insert(key, Value::Object(existing));
            }
            (_, incoming) => {
                dst.insert(key, incoming);
            }
        }
    }
}
