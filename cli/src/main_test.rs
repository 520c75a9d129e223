mod tests {
    use crate::*;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let args = CliArgs::try_parse_from(["heapchurn"]).expect("should parse");
        let config = args.workload_config();
        assert_eq!(config, WorkloadConfig::default());
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_flags_override_every_field() {
        let args = CliArgs::try_parse_from([
            "heapchurn",
            "--alloc-bytes",
            "1024",
            "--churn-batch",
            "10",
            "--leak-every",
            "5",
            "--run-seconds",
            "1",
            "--report-ms",
            "500",
            "--seed",
            "42",
        ])
        .expect("should parse");
        let config = args.workload_config();
        assert_eq!(config.alloc_bytes, 1024);
        assert_eq!(config.churn_batch, 10);
        assert_eq!(config.leak_every, 5);
        assert_eq!(config.run_duration, Duration::from_secs(1));
        assert_eq!(config.report_interval, Duration::from_millis(500));
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_zero_values_are_accepted() {
        let args = CliArgs::try_parse_from([
            "heapchurn",
            "--alloc-bytes",
            "0",
            "--churn-batch",
            "0",
            "--leak-every",
            "0",
            "--run-seconds",
            "0",
            "--report-ms",
            "0",
        ])
        .expect("zero is valid everywhere");
        let config = args.workload_config();
        assert_eq!(config.run_duration, Duration::ZERO);
        assert_eq!(config.leak_every, 0);
    }

    #[test]
    fn test_malformed_values_fail_at_parse_time() {
        assert!(CliArgs::try_parse_from(["heapchurn", "--alloc-bytes", "lots"]).is_err());
        assert!(CliArgs::try_parse_from(["heapchurn", "--leak-every", "-1"]).is_err());
        assert!(CliArgs::try_parse_from(["heapchurn", "--run-seconds", "1.5"]).is_err());
    }

    #[test]
    fn test_env_toggle_parsing() {
        assert!(env_toggle_enabled("1"));
        assert!(env_toggle_enabled("true"));
        assert!(env_toggle_enabled("heapchurn::engine=trace"));
        assert!(!env_toggle_enabled(""));
        assert!(!env_toggle_enabled("0"));
        assert!(!env_toggle_enabled("off"));
        assert!(!env_toggle_enabled("FALSE"));
    }

    #[test]
    fn test_filter_expr_extraction() {
        assert_eq!(filter_expr_from("1"), None);
        assert_eq!(filter_expr_from("on"), None);
        assert_eq!(
            filter_expr_from(" heapchurn::engine=trace ").as_deref(),
            Some("heapchurn::engine=trace")
        );
    }
}
