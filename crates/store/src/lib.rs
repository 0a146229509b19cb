//! Blob storage abstraction for QuickStats
//!
//! The engine talks to the object store through the [`BlobStore`] trait:
//! three calls (probe, read, write) over whole JSON blobs identified by a
//! string key, each returning an opaque ETag. The trait is implemented here
//! for an in-memory store used by tests and local dry runs; a production
//! deployment supplies its own implementation over a real object-store
//! client. Networking, retries, and authentication all belong to that
//! implementation, never to the engine.
//!
//! Store instances are constructed once by the composition root and injected
//! into the engine; there is no lazy global client.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod testing;

use quickstats_core::Result;
use serde_json::Value;

pub use memory::MemoryBlobStore;

/// Receipt returned by a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    /// ETag of the blob after the write, when the store reports one
    pub etag: Option<String>,
    /// Storage-assigned content version identifier, when versioning is on
    pub version_id: Option<String>,
}

/// Storage abstraction for versioned JSON blobs
///
/// ETags are opaque tokens used only for equality comparison, never parsed.
/// "Absent" is modeled with `Ok(None)`; every other failure is an error
/// (`Error::Storage` for transport problems, `Error::Corruption` when a blob
/// exists but is not valid JSON).
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait BlobStore: Send + Sync {
    /// Fetch the current ETag for a key without reading the body
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn probe(&self, key: &str) -> Result<Option<String>>;

    /// Read the blob body as a JSON document, with its ETag
    ///
    /// An empty or whitespace-only blob reads as an empty object document.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails or the blob is not
    /// valid JSON.
    fn read(&self, key: &str) -> Result<Option<(Value, Option<String>)>>;

    /// Write the document as the blob's new content
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn write(&self, key: &str, doc: &Value) -> Result<PutReceipt>;
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn probe(&self, key: &str) -> Result<Option<String>> {
        (**self).probe(key)
    }

    fn read(&self, key: &str) -> Result<Option<(Value, Option<String>)>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, doc: &Value) -> Result<PutReceipt> {
        (**self).write(key, doc)
    }
}
