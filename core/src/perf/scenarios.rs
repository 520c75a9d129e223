use std::time::Duration;

use anyhow::Result;

use crate::config::WorkloadConfig;
use crate::engine::Engine;

/// Seed shared by every tool that prepares a scenario, so fragmentation
/// patterns are identical across benches and profiling runs.
pub const SCENARIO_SEED: u64 = 0x6865_6170;

pub struct ChurnOutcome {
    pub ops: u64,
    pub leaked: usize,
}

#[derive(Clone)]
pub struct WorkloadScenario {
    key: &'static str,
    title: &'static str,
    alloc_bytes: usize,
    churn_batch: usize,
    leak_every: u64,
}

impl WorkloadScenario {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn bench_case_name(&self) -> String {
        format!("{}_churn", self.key)
    }

    pub fn config(&self) -> WorkloadConfig {
        WorkloadConfig {
            alloc_bytes: self.alloc_bytes,
            churn_batch: self.churn_batch,
            leak_every: self.leak_every,
            run_duration: Duration::from_secs(1),
            report_interval: Duration::from_millis(200),
        }
    }

    pub fn prepare(&self) -> Engine {
        Engine::seeded(self.config(), SCENARIO_SEED)
    }

    /// Run `iterations` churn cycles and verify the retention arithmetic.
    pub fn run_churn(&self, iterations: u64) -> Result<ChurnOutcome> {
        let mut engine = self.prepare();
        for _ in 0..iterations {
            engine.churn_once();
        }
        let outcome = ChurnOutcome {
            ops: engine.ops(),
            leaked: engine.leaked(),
        };
        self.verify(&outcome)?;
        Ok(outcome)
    }

    fn verify(&self, outcome: &ChurnOutcome) -> Result<()> {
        let expected = if self.leak_every == 0 {
            0
        } else {
            (outcome.ops / self.leak_every) as usize
        };
        if outcome.leaked == expected {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "scenario {}: expected {} retained blocks after {} ops but observed {}",
                self.key,
                expected,
                outcome.ops,
                outcome.leaked
            ))
        }
    }
}

static WORKLOAD_SCENARIOS: &[WorkloadScenario] = &[
    WorkloadScenario {
        key: "small_churn",
        title: "Small blocks, churn only",
        alloc_bytes: 1024,
        churn_batch: 256,
        leak_every: 0,
    },
    WorkloadScenario {
        key: "leak_heavy",
        title: "4 KiB blocks, retain every 8th",
        alloc_bytes: 4096,
        churn_batch: 256,
        leak_every: 8,
    },
    WorkloadScenario {
        key: "default_shape",
        title: "Default 64 KiB blocks with slow leak, scaled batch",
        alloc_bytes: 65536,
        churn_batch: 128,
        leak_every: 200,
    },
    WorkloadScenario {
        key: "tiny_batch",
        title: "Batch below fragmentation threshold",
        alloc_bytes: 512,
        churn_batch: 3,
        leak_every: 1,
    },
];

pub fn workload_scenarios() -> &'static [WorkloadScenario] {
    WORKLOAD_SCENARIOS
}
