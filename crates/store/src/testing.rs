//! Test doubles for the storage layer
//!
//! [`FlakyStore`] wraps any [`BlobStore`], counting calls and optionally
//! failing them, so tests can assert on interaction patterns (dry runs must
//! never write) and on how storage failures propagate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use quickstats_core::{Error, Result};
use serde_json::Value;

use crate::{BlobStore, PutReceipt};

/// Call-counting, fault-injecting [`BlobStore`] wrapper
#[derive(Debug, Default)]
pub struct FlakyStore<S> {
    inner: S,
    fail_probes: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    probes: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<S: BlobStore> FlakyStore<S> {
    /// Wrap a store
    pub fn new(inner: S) -> Self {
        FlakyStore {
            inner,
            fail_probes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            probes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Access the wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Make subsequent probes fail with a storage error
    pub fn fail_probes(&self, fail: bool) {
        self.fail_probes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads fail with a storage error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of probe calls observed
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of read calls observed
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls observed
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<S: BlobStore> BlobStore for FlakyStore<S> {
    fn probe(&self, key: &str) -> Result<Option<String>> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.fail_probes.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected probe failure".to_string()));
        }
        self.inner.probe(key)
    }

    fn read(&self, key: &str) -> Result<Option<(Value, Option<String>)>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected read failure".to_string()));
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, doc: &Value) -> Result<PutReceipt> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Storage("injected write failure".to_string()));
        }
        self.inner.write(key, doc)
    }
}
