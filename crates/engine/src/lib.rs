//! Optimistic read-modify-write engine for QuickStats
//!
//! [`StatsEngine`] orchestrates one update request end to end:
//!
//! 1. **Loading** — probe the blob's ETag and read its body; an absent blob
//!    is an empty document.
//! 2. **Checking** — reject if the document is missing and creation is
//!    disallowed, or if the caller's expected ETag doesn't match.
//! 3. **Mutating** — apply the operations in order; the first failure aborts
//!    and nothing is persisted.
//! 4. **Persisting** — write the whole document back, unless this is a dry
//!    run.
//!
//! The unit of atomicity is the request's write: the whole mutated document
//! or nothing. The read and the write are *not* atomic as a pair — another
//! writer can slip between them, and the ETag comparison is purely
//! client-side. This is a documented limitation; closing it would require a
//! conditional-write operation on [`BlobStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

use std::sync::Arc;

use quickstats_core::{apply_ops, validate_document, Error, OpSpec, Result};
use quickstats_store::BlobStore;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

pub use config::EngineConfig;

/// One update request against a single application's stats document
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Application whose document is targeted; becomes the key prefix
    pub app_name: String,
    /// Operations to apply, in order
    pub ops: Vec<OpSpec>,
    /// When false, an absent (or empty) document fails with NotFound
    pub create_if_missing: bool,
    /// Compute the result without writing it back
    pub dry_run: bool,
    /// Optimistic-concurrency precondition: fail unless the stored ETag
    /// matches
    pub if_match_etag: Option<String>,
}

impl UpdateRequest {
    /// Request with defaults: no ops, creation allowed, writes enabled
    pub fn new(app_name: impl Into<String>) -> Self {
        UpdateRequest {
            app_name: app_name.into(),
            ops: Vec::new(),
            create_if_missing: true,
            dry_run: false,
            if_match_etag: None,
        }
    }

    /// Set the operation batch
    pub fn with_ops(mut self, ops: Vec<OpSpec>) -> Self {
        self.ops = ops;
        self
    }

    /// Disallow creating a missing document
    pub fn with_create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Request a dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the expected ETag precondition
    pub fn with_if_match_etag(mut self, etag: impl Into<String>) -> Self {
        self.if_match_etag = Some(etag.into());
        self
    }
}

/// Result of a successful update
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    /// Bucket the document lives in
    pub bucket: String,
    /// Object key of the document
    pub key: String,
    /// The document after mutation
    pub stats: Value,
    /// ETag after the write (current ETag for dry runs; None when the store
    /// reported none)
    pub etag: Option<String>,
    /// Storage-assigned content version id, when the store provides one
    pub version_id: Option<String>,
    /// Whether the write was skipped
    pub dry_run: bool,
}

/// Applies update requests to stats documents with optimistic concurrency
pub struct StatsEngine {
    store: Arc<dyn BlobStore>,
    config: EngineConfig,
}

impl StatsEngine {
    /// Create an engine over an injected store
    pub fn new(store: Arc<dyn BlobStore>, config: EngineConfig) -> Self {
        StatsEngine { store, config }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Object key for an application's stats document
    pub fn key_for(app_name: &str) -> String {
        format!("{}/stats.json", app_name)
    }

    /// Run one request through load → check → mutate → persist
    ///
    /// # Errors
    ///
    /// - [`Error::Malformed`] for a missing application name
    /// - [`Error::Validation`] from the operation batch
    /// - [`Error::NotFound`] when the document is absent/empty and
    ///   `create_if_missing` is false
    /// - [`Error::Conflict`] when the ETag precondition fails
    /// - [`Error::Storage`] / [`Error::Corruption`] from the store
    pub fn apply(&self, req: &UpdateRequest) -> Result<UpdateOutcome> {
        let app_name = req.app_name.trim();
        if app_name.is_empty() {
            return Err(Error::malformed("Missing or invalid appName"));
        }
        let key = Self::key_for(app_name);

        // Loading: prefer the probe's tag when both calls report one.
        let probe_etag = self.store.probe(&key)?;
        let (mut stats, body_etag) = match self.store.read(&key)? {
            Some((doc, etag)) => (doc, etag),
            None => (Value::Object(Map::new()), None),
        };
        if !stats.is_object() {
            return Err(Error::Corruption(format!(
                "stats document at {} is not an object",
                key
            )));
        }
        let current_etag = probe_etag.or(body_etag);
        debug!(
            target: "quickstats::engine",
            app = %app_name,
            key = %key,
            etag = ?current_etag,
            ops = req.ops.len(),
            "loaded stats document"
        );

        let is_empty = stats.as_object().map(Map::is_empty).unwrap_or(true);
        if is_empty && !req.create_if_missing {
            return Err(Error::NotFound("Stats file not found".to_string()));
        }

        // Checking: the comparison is client-side and advisory only. With no
        // current tag (fresh document) the precondition passes.
        if let (Some(expected), Some(current)) = (&req.if_match_etag, &current_etag) {
            if expected != current {
                warn!(
                    target: "quickstats::engine",
                    app = %app_name,
                    expected = %expected,
                    current = %current,
                    "rejecting on etag mismatch"
                );
                return Err(Error::Conflict {
                    expected: expected.clone(),
                    current: current.clone(),
                });
            }
        }

        // Mutating: in caller order, first failure aborts. The document is
        // private to this request, so aborting discards every earlier edit.
        apply_ops(&mut stats, &req.ops, self.config.conflict_policy)?;
        validate_document(&stats)?;

        // Persisting, or returning the computed document untouched.
        if req.dry_run || self.config.force_dry_run {
            info!(
                target: "quickstats::engine",
                app = %app_name,
                key = %key,
                ops = req.ops.len(),
                "dry run, skipping write"
            );
            return Ok(UpdateOutcome {
                bucket: self.config.bucket.clone(),
                key,
                stats,
                etag: current_etag,
                version_id: None,
                dry_run: true,
            });
        }

        let receipt = self.store.write(&key, &stats)?;
        info!(
            target: "quickstats::engine",
            app = %app_name,
            key = %key,
            etag = ?receipt.etag,
            ops = req.ops.len(),
            "updated stats document"
        );
        Ok(UpdateOutcome {
            bucket: self.config.bucket.clone(),
            key,
            stats,
            etag: receipt.etag,
            version_id: receipt.version_id,
            dry_run: false,
        })
    }
}
