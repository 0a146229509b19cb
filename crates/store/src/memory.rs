//! In-memory blob store
//!
//! Backs tests and local dry runs. Blobs are held as serialized JSON text so
//! reads go through the same parse path a remote store would; ETags are
//! content hashes (quoted, like HTTP ETags) and version ids count writes per
//! key.

use std::collections::HashMap;

use parking_lot::RwLock;
use quickstats_core::{Error, Result};
use serde_json::Value;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::{BlobStore, PutReceipt};

#[derive(Debug, Clone)]
struct StoredBlob {
    body: String,
    etag: String,
    writes: u64,
}

/// Thread-safe in-memory [`BlobStore`]
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryBlobStore::default()
    }

    /// Seed a key with raw blob text, bypassing JSON serialization
    ///
    /// Lets tests plant empty or malformed blobs that a real store could
    /// contain.
    pub fn seed_raw(&self, key: &str, body: impl Into<String>) {
        let body = body.into();
        let etag = content_etag(&body);
        self.blobs.write().insert(
            key.to_string(),
            StoredBlob {
                body,
                etag,
                writes: 1,
            },
        );
    }

    /// Current ETag of a key, if present
    pub fn etag_of(&self, key: &str) -> Option<String> {
        self.blobs.read().get(key).map(|blob| blob.etag.clone())
    }

    /// Raw blob text of a key, if present
    pub fn body_of(&self, key: &str) -> Option<String> {
        self.blobs.read().get(key).map(|blob| blob.body.clone())
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// True when no blobs are held
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn probe(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().get(key).map(|blob| blob.etag.clone()))
    }

    fn read(&self, key: &str) -> Result<Option<(Value, Option<String>)>> {
        let blobs = self.blobs.read();
        let Some(blob) = blobs.get(key) else {
            return Ok(None);
        };

        if blob.body.trim().is_empty() {
            return Ok(Some((Value::Object(Default::default()), Some(blob.etag.clone()))));
        }

        let doc: Value = serde_json::from_str(&blob.body)
            .map_err(|e| Error::Corruption(format!("blob at {} is not valid JSON: {}", key, e)))?;
        Ok(Some((doc, Some(blob.etag.clone()))))
    }

    fn write(&self, key: &str, doc: &Value) -> Result<PutReceipt> {
        let body = doc.to_string();
        let etag = content_etag(&body);

        let mut blobs = self.blobs.write();
        let entry = blobs.entry(key.to_string()).or_insert(StoredBlob {
            body: String::new(),
            etag: String::new(),
            writes: 0,
        });
        entry.body = body;
        entry.etag = etag.clone();
        entry.writes += 1;
        let version_id = format!("v{}", entry.writes);

        debug!(target: "quickstats::store", key = %key, etag = %etag, version = %version_id, "wrote blob");
        Ok(PutReceipt {
            etag: Some(etag),
            version_id: Some(version_id),
        })
    }
}

/// Quoted content-hash ETag, stable for identical bodies
fn content_etag(body: &str) -> String {
    format!("\"{:016x}\"", xxh3_64(body.as_bytes()))
}
