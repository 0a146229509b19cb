//! QuickStats - per-application JSON stats documents in blob storage
//!
//! Each application owns one JSON document at `{app}/stats.json`. Clients
//! mutate it with a small patch protocol (set, inc, delete, merge, append by
//! dotted path); the engine reads the whole document, applies the batch in
//! memory, and writes the whole document back with a client-side ETag check.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use quickstats::{EngineConfig, MemoryBlobStore, OpSpec, StatsEngine, UpdateRequest};
//!
//! let store = Arc::new(MemoryBlobStore::new());
//! let engine = StatsEngine::new(store, EngineConfig::new("quick-stats"));
//!
//! let outcome = engine
//!     .apply(&UpdateRequest::new("my-app").with_ops(vec![
//!         OpSpec::inc("totals.visits"),
//!         OpSpec::set("totals.lastCountry", serde_json::json!("MX")),
//!     ]))
//!     .unwrap();
//! assert_eq!(outcome.stats["totals"]["visits"], 1);
//! ```
//!
//! # Architecture
//!
//! - [`quickstats_core`]: paths, operations, deep merge, document limits
//! - [`quickstats_store`]: the [`BlobStore`] abstraction and in-memory store
//! - [`quickstats_engine`]: the read-modify-write loop with concurrency guard
//! - [`quickstats_api`]: gateway event handling and wire formats

// Re-export the public API from the member crates
pub use quickstats_api::{Event, Handler, Response, UpdateBody, UpdateReply};
pub use quickstats_core::{apply_ops, ConflictPolicy, Error, OpSpec, Result};
pub use quickstats_engine::{EngineConfig, StatsEngine, UpdateOutcome, UpdateRequest};
pub use quickstats_store::{BlobStore, MemoryBlobStore, PutReceipt};
