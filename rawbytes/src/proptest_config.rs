use proptest::test_runner::Config as ProptestConfig;

/// Shared property test configuration. `PROPTEST_CASES` still overrides the
/// case count.
pub(crate) fn proptest_cfg() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|cases| cases.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}
