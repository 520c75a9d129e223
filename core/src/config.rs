//! Fixed run configuration for the workload engine.
//!
//! A `WorkloadConfig` is read once when a run starts and never mutated.
//! Validation of raw input (flags, environment) happens in whatever loads the
//! configuration; by the time a config reaches the engine every field is a
//! plain non-negative quantity, and zero is a valid value for all of them.

use std::time::Duration;

pub const DEFAULT_ALLOC_BYTES: usize = 65536;
pub const DEFAULT_CHURN_BATCH: usize = 4000;
pub const DEFAULT_LEAK_EVERY: u64 = 200;
pub const DEFAULT_RUN_SECONDS: u64 = 180;
pub const DEFAULT_REPORT_MS: u64 = 2000;

/// Parameters of one workload run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadConfig {
    /// Bytes per allocated block.
    pub alloc_bytes: usize,
    /// Blocks allocated per loop iteration.
    pub churn_batch: usize,
    /// Retain every Nth allocation permanently; 0 disables retention.
    pub leak_every: u64,
    /// Total wall-clock budget for the loop.
    pub run_duration: Duration,
    /// Minimum spacing between progress reports.
    pub report_interval: Duration,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            alloc_bytes: DEFAULT_ALLOC_BYTES,
            churn_batch: DEFAULT_CHURN_BATCH,
            leak_every: DEFAULT_LEAK_EVERY,
            run_duration: Duration::from_secs(DEFAULT_RUN_SECONDS),
            report_interval: Duration::from_millis(DEFAULT_REPORT_MS),
        }
    }
}
