//! Engine configuration
//!
//! All configuration is explicit and passed in by the composition root; the
//! engine never reads the environment itself. A deployment that wants the
//! historical behavior of a `DRY_RUN` environment switch reads it once at
//! startup and sets [`EngineConfig::force_dry_run`].

use quickstats_core::ConflictPolicy;

/// Configuration for [`StatsEngine`](crate::StatsEngine)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bucket (or equivalent container) the stats blobs live in; reported
    /// back in responses
    pub bucket: String,
    /// Force every request into dry-run mode, regardless of what the
    /// request asks for
    pub force_dry_run: bool,
    /// What to do when a path segment conflicts with an existing container's
    /// shape
    pub conflict_policy: ConflictPolicy,
}

impl EngineConfig {
    /// Configuration with defaults: writes enabled, destructive-replace
    /// conflict policy
    pub fn new(bucket: impl Into<String>) -> Self {
        EngineConfig {
            bucket: bucket.into(),
            force_dry_run: false,
            conflict_policy: ConflictPolicy::default(),
        }
    }

    /// Force every request into dry-run mode
    pub fn with_force_dry_run(mut self, force: bool) -> Self {
        self.force_dry_run = force;
        self
    }

    /// Override the path conflict policy
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}
