//! Shared workload scenario definitions used by benches and reporting
//! utilities.
//!
//! Centralizing the scenarios here keeps Criterion benches, ad-hoc stress
//! runs, and the test suite in sync so we do not accidentally compare
//! different workload shapes across tools.

pub mod scenarios;

#[cfg(test)]
mod scenarios_test;
