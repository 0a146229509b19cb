//! Wire formats for the update endpoint
//!
//! Requests use camelCase keys. The body is permissive at the serde layer
//! (every field optional or defaulted) so that shape problems surface as
//! deliberate 400 messages rather than opaque deserialization errors.

use quickstats_core::{Error, OpSpec, Result};
use quickstats_engine::{UpdateOutcome, UpdateRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// Request body of an update call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    /// Application whose stats document is targeted
    #[serde(default)]
    pub app_name: Option<String>,
    /// Operation list; held loose so a non-array gets its own message
    #[serde(default)]
    pub ops: Option<Value>,
    /// Whether a missing document may be created (default true)
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
    /// Compute without persisting
    #[serde(default)]
    pub dry_run: bool,
    /// Optimistic-concurrency precondition
    #[serde(default)]
    pub if_match_etag: Option<String>,
}

impl UpdateBody {
    /// Validate the body into an engine request
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] for a missing/blank `appName`, a
    /// non-array `ops`, or an op entry that is not an object.
    pub fn into_request(self) -> Result<UpdateRequest> {
        let app_name = match self.app_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(Error::malformed("Missing or invalid appName")),
        };

        let ops = match self.ops {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<OpSpec>(item)
                        .map_err(|_| Error::malformed("each op must be an object"))
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::malformed("ops must be a list")),
        };

        Ok(UpdateRequest {
            app_name,
            ops,
            create_if_missing: self.create_if_missing,
            dry_run: self.dry_run,
            if_match_etag: self.if_match_etag,
        })
    }
}

/// Successful response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReply {
    /// Always true in this shape
    pub ok: bool,
    /// Bucket the document lives in
    pub bucket: String,
    /// Object key of the document
    pub key: String,
    /// The document after the update
    pub stats: Value,
    /// Resulting ETag; explicit null when the store reported none
    pub etag: Option<String>,
    /// Version id of the write; omitted entirely when there is none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Whether the write was skipped
    pub dry_run: bool,
}

impl From<UpdateOutcome> for UpdateReply {
    fn from(outcome: UpdateOutcome) -> Self {
        UpdateReply {
            ok: true,
            bucket: outcome.bucket,
            key: outcome.key,
            stats: outcome.stats,
            etag: outcome.etag,
            version_id: outcome.version_id,
            dry_run: outcome.dry_run,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    /// Always false in this shape
    pub ok: bool,
    /// Human-readable message
    pub error: String,
}

impl ErrorReply {
    /// Build an error body
    pub fn new(error: impl Into<String>) -> Self {
        ErrorReply {
            ok: false,
            error: error.into(),
        }
    }
}
