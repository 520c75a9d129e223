use std::io::{self, Write};
use std::sync::Once;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use heapchurn_core::{
    config::{
        DEFAULT_ALLOC_BYTES, DEFAULT_CHURN_BATCH, DEFAULT_LEAK_EVERY, DEFAULT_REPORT_MS, DEFAULT_RUN_SECONDS,
        WorkloadConfig,
    },
    engine::Engine,
};

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "heapchurn::engine=debug,heapchurn::cli=info,heapchurn_core=info,heapchurn_cli=info";

#[cfg(test)]
mod main_test;

#[derive(Debug, Parser)]
#[command(
    name = "heapchurn",
    author,
    version,
    about = "Synthetic allocation/churn/leak workload for exercising a collector",
    long_about = None
)]
struct CliArgs {
    /// Bytes per allocated block
    #[arg(long, env = "HEAPCHURN_ALLOC_BYTES", default_value_t = DEFAULT_ALLOC_BYTES)]
    alloc_bytes: usize,

    /// Blocks allocated per loop iteration
    #[arg(long, env = "HEAPCHURN_CHURN_BATCH", default_value_t = DEFAULT_CHURN_BATCH)]
    churn_batch: usize,

    /// Retain every Nth allocation permanently (0 = never)
    #[arg(long, env = "HEAPCHURN_LEAK_EVERY", default_value_t = DEFAULT_LEAK_EVERY)]
    leak_every: u64,

    /// Total run duration in seconds
    #[arg(long, env = "HEAPCHURN_RUN_SECONDS", default_value_t = DEFAULT_RUN_SECONDS)]
    run_seconds: u64,

    /// Minimum spacing between progress reports, in milliseconds
    #[arg(long, env = "HEAPCHURN_REPORT_MS", default_value_t = DEFAULT_REPORT_MS)]
    report_ms: u64,

    /// Seed for the fragmentation RNG; omit for a fresh pattern per run
    #[arg(long, env = "HEAPCHURN_SEED")]
    seed: Option<u64>,
}

impl CliArgs {
    fn workload_config(&self) -> WorkloadConfig {
        WorkloadConfig {
            alloc_bytes: self.alloc_bytes,
            churn_batch: self.churn_batch,
            leak_every: self.leak_every,
            run_duration: Duration::from_secs(self.run_seconds),
            report_interval: Duration::from_millis(self.report_ms),
        }
    }
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Diagnostics go to stderr only; stdout carries the report line protocol
// that external log correlation consumes.
fn maybe_init_tracing() {
    let raw = match std::env::var("HEAPCHURN_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let args = CliArgs::parse();
    let config = args.workload_config();

    let mut engine = match args.seed {
        Some(seed) => Engine::seeded(config, seed),
        None => Engine::new(config),
    };

    tracing::info!(
        target: "heapchurn::cli",
        alloc_bytes = config.alloc_bytes,
        churn_batch = config.churn_batch,
        leak_every = config.leak_every,
        run_seconds = config.run_duration.as_secs(),
        report_ms = config.report_interval.as_millis() as u64,
        seeded = args.seed.is_some(),
        "starting workload"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = engine.run(&mut out).context("emit workload status lines")?;
    out.flush().context("flush stdout")?;

    tracing::info!(
        target: "heapchurn::cli",
        ops = summary.ops,
        leaked = summary.leaked,
        reports = summary.reports,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "workload complete"
    );
    Ok(())
}
