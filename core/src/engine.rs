//! The workload engine: a timed allocation/churn/leak loop.
//!
//! Each iteration refills a working batch of fixed-size blocks, optionally
//! diverts every Nth block into a permanently retained set (the simulated
//! leak), punches random holes into the batch (fragmentation), and emits a
//! progress line whenever the report deadline has passed. The loop ends when
//! the monotonic clock reaches the configured budget, after which exactly one
//! completion line is written.
//!
//! All state is owned by the `Engine` instance, so multiple engines can run
//! in one process without interfering. The randomness driving fragmentation
//! is injectable; a seeded engine produces the same hole pattern every run.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::WorkloadConfig;
use crate::report;
use crate::util::fast_map::{FastHashMap, fast_hash_map_new};

/// A single allocated unit.
///
/// Blocks are write-once: a sentinel byte is stored at the first and last
/// position during construction so the buffer is actually resident instead of
/// being a lazily-mapped zero page the optimizer can elide. The `Arc` lets a
/// retained block alias the batch slot it came from, the same way a cache
/// entry pins a buffer the working set also sees; dropping the batch slot
/// frees nothing until the retained set lets go, which for a leaked block is
/// never.
#[derive(Debug, Clone)]
pub struct Block(Arc<Vec<u8>>);

impl Block {
    pub fn resident(len: usize) -> Self {
        let mut buf = vec![0u8; len];
        if let Some(first) = buf.first_mut() {
            *first = 1;
        }
        if let Some(last) = buf.last_mut() {
            *last = 1;
        }
        Block(Arc::new(buf))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the engine is in its lifecycle. The only terminal transition is
/// `Running` -> `Done`, driven by the monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Done,
}

/// Totals observed when a run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cumulative allocation count.
    pub ops: u64,
    /// Final size of the retained set.
    pub leaked: usize,
    /// Number of periodic report lines emitted.
    pub reports: u64,
    /// Wall time the loop actually consumed.
    pub elapsed: Duration,
}

/// Shareable read-only view of the live operation counter.
///
/// The counter has a single writer (the engine loop); the probe reads it
/// atomically, so a concurrent observer never sees a torn value.
#[derive(Debug, Clone)]
pub struct OpsProbe(Arc<AtomicU64>);

impl OpsProbe {
    pub fn ops(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// The workload engine. One instance drives one run at a time; `run` resets
/// all counters and collections at entry, so reusing an instance behaves like
/// a fresh one.
#[derive(Debug)]
pub struct Engine<R: Rng = SmallRng> {
    config: WorkloadConfig,
    rng: R,
    ops: Arc<AtomicU64>,
    retained: FastHashMap<u64, Block>,
    batch: Vec<Option<Block>>,
    phase: Phase,
}

impl Engine<SmallRng> {
    /// Engine with a per-run random fragmentation pattern.
    pub fn new(config: WorkloadConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Engine with a fixed seed; fragmentation is fully deterministic.
    pub fn seeded(config: WorkloadConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(config: WorkloadConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            ops: Arc::new(AtomicU64::new(0)),
            retained: fast_hash_map_new(),
            batch: Vec::with_capacity(config.churn_batch),
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Handle for reading the live operation count from another thread.
    pub fn probe(&self) -> OpsProbe {
        OpsProbe(Arc::clone(&self.ops))
    }

    /// Cumulative allocation count.
    pub fn ops(&self) -> u64 {
        self.ops.load(Ordering::Relaxed)
    }

    /// Current size of the retained set.
    pub fn leaked(&self) -> usize {
        self.retained.len()
    }

    /// Declared size of the working batch, holes included.
    pub fn batch_slots(&self) -> usize {
        self.batch.len()
    }

    /// Slots of the working batch still holding a block.
    pub fn batch_live(&self) -> usize {
        self.batch.iter().filter(|slot| slot.is_some()).count()
    }

    /// Indices of the holes punched into the current batch.
    pub fn hole_indices(&self) -> Vec<usize> {
        self.batch
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.is_none().then_some(idx))
            .collect()
    }

    /// One churn iteration: refill the batch, divert leaks, punch holes.
    ///
    /// This is the loop body of [`Engine::run`] without the clock and report
    /// bookkeeping; benches drive it directly.
    pub fn churn_once(&mut self) {
        self.batch.clear();
        for _ in 0..self.config.churn_batch {
            let block = Block::resident(self.config.alloc_bytes);
            let n = self.ops.fetch_add(1, Ordering::Relaxed) + 1;
            if self.config.leak_every > 0 && n % self.config.leak_every == 0 {
                // The only path by which a block outlives the batch.
                self.retained.insert(n, block.clone());
            }
            self.batch.push(Some(block));
        }

        let bound = self.config.churn_batch / 4;
        if bound > 0 {
            let drops = self.rng.gen_range(0..bound);
            for _ in 0..drops {
                let idx = self.rng.gen_range(0..self.batch.len());
                // Re-dropping an already-empty slot is a no-op.
                self.batch[idx] = None;
            }
            trace!(target: "heapchurn::engine", drops, "fragmented batch");
        }
    }

    /// Drive the timed loop until the run budget is exhausted, writing the
    /// line protocol to `sink`.
    ///
    /// Allocation failure is not caught anywhere below this: running the host
    /// out of memory is an accepted outcome of aggressive configurations, and
    /// masking it would defeat the purpose of the workload.
    pub fn run<W: Write>(&mut self, sink: &mut W) -> io::Result<RunSummary> {
        self.ops.store(0, Ordering::Relaxed);
        self.retained.clear();
        self.batch.clear();
        self.phase = Phase::Running;

        let start = Instant::now();
        let end = start + self.config.run_duration;
        let mut next_report = start + self.config.report_interval;
        let mut reports = 0u64;

        while Instant::now() < end {
            self.churn_once();

            let now = Instant::now();
            if now >= next_report {
                let ops = self.ops();
                report::write_report(sink, now - start, ops, self.batch.len(), self.retained.len())?;
                debug!(target: "heapchurn::engine", ops, leaked = self.retained.len(), "progress report");
                // Advance from now, not from start: cadence self-corrects
                // under loop jitter instead of bunching up.
                next_report = now + self.config.report_interval;
                reports += 1;
            }

            if self.config.churn_batch == 0 {
                // Nothing to allocate; spinning on the clock alone would peg
                // a core, so give the scheduler a chance.
                std::thread::yield_now();
            }
        }

        let summary = RunSummary {
            ops: self.ops(),
            leaked: self.retained.len(),
            reports,
            elapsed: start.elapsed(),
        };
        report::write_completion(sink, summary.ops, summary.leaked)?;
        self.phase = Phase::Done;
        Ok(summary)
    }
}
