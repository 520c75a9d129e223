use super::scenarios::workload_scenarios;

#[test]
fn scenario_keys_are_unique() {
    let mut keys: Vec<_> = workload_scenarios().iter().map(|s| s.key()).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), workload_scenarios().len());
}

#[test]
fn every_scenario_passes_retention_verification() {
    for scenario in workload_scenarios() {
        let outcome = scenario
            .run_churn(3)
            .unwrap_or_else(|err| panic!("scenario {} failed: {err:#}", scenario.key()));
        assert_eq!(outcome.ops, scenario.config().churn_batch as u64 * 3);
    }
}

#[test]
fn bench_case_names_derive_from_keys() {
    for scenario in workload_scenarios() {
        assert!(scenario.bench_case_name().ends_with("_churn"));
        assert!(scenario.bench_case_name().starts_with(scenario.key()));
        assert!(!scenario.title().is_empty());
    }
}
