pub mod config;
pub mod engine;
pub mod report;
pub mod util;

// Shared workload scenarios for benches and reporting
pub mod perf;

#[cfg(test)]
mod report_test;
