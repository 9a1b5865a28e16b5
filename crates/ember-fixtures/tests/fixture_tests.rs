//! Runs the bundled fixture pack end to end

use ember_fixtures::{FixtureError, FixtureRunner};
use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_basic_pack_passes() {
    let runner = FixtureRunner::new(true);
    let report = runner.run_file(&data_path("basic.json"), None).unwrap();

    assert!(report.total() > 30);
    assert!(report.is_success(), "{}", report);
    assert_eq!(report.pass_rate(), 100.0);
}

#[test]
fn test_filter_selects_by_name() {
    let runner = FixtureRunner::new(false);
    let report = runner
        .run_file(&data_path("basic.json"), Some("CALL ("))
        .unwrap();

    // CALL, STATICCALL and DELEGATECALL fixtures
    assert_eq!(report.total(), 6);
    assert!(report.passed.iter().all(|name| name.contains("CALL (")));
}

#[test]
fn test_missing_file_is_io_error() {
    let runner = FixtureRunner::new(false);
    let err = runner
        .run_file(&data_path("does-not-exist.json"), None)
        .unwrap_err();
    assert!(matches!(err, FixtureError::Io(_)));
}

#[test]
fn test_fixtures_do_not_share_state() {
    // Same storage slot read in two fixtures: the second must not see the first's write
    let json = r#"[
        {"name":"write","code":{"bin":"602a600155600154"},"expect":{"stack":["0x2a"]}},
        {"name":"read","code":{"bin":"600154"},"expect":{"stack":["0x0"]}}
    ]"#;
    let fixtures = ember_fixtures::parse_fixtures(json).unwrap();
    let report = FixtureRunner::new(false).run_all("inline".into(), &fixtures, None);
    assert!(report.is_success(), "{}", report);
}
