//! Fixture runner over the bundled fixtures

mod common;

use classlocate_ir::config::{ReportFormat, RunConfig};
use classlocate_ir::features::verification::{
    FixtureRunner, JsonReporter, MarkdownReporter, RunReport, VectorField,
};
use common::*;
use pretty_assertions::assert_eq;

fn run(roots: Vec<std::path::PathBuf>) -> RunReport {
    FixtureRunner::new(RunConfig::with_roots(roots).threads(2))
        .run()
        .unwrap()
}

#[test]
fn java_fixtures_pass() {
    let report = run(vec![fixture_root("java")]);
    assert_eq!(report.errors, vec![]);
    assert_eq!(report.files.len(), 2);
    assert!(report.is_success(), "{}", report.summary());
    // 1 file vector + 6 element vectors, 1 file vector + 5 element vectors
    assert_eq!(report.total(), 13);
}

#[test]
fn kotlin_fixture_passes() {
    let report = run(vec![fixture_root("kotlin")]);
    assert!(report.is_success(), "{}", report.summary());
    assert_eq!(report.total(), 9);
}

#[test]
fn whole_fixture_tree_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("classlocate.yaml");
    std::fs::write(
        &config_path,
        format!(
            "version: 1\nroots: [{:?}]\nthreads: 1\nreport:\n  format: json\n  output_dir: {:?}\n",
            fixture_path("").display().to_string(),
            dir.path().join("out").display().to_string()
        ),
    )
    .unwrap();

    let config = RunConfig::from_yaml(&config_path).unwrap();
    assert_eq!(config.report.format, ReportFormat::Json);

    let output_dir = config.report.output_dir.clone();
    let report = FixtureRunner::new(config).run().unwrap();
    assert!(report.is_success(), "{}", report.summary());
    assert_eq!(report.files.len(), 3);

    let path = JsonReporter::save(&report, &output_dir).unwrap();
    let loaded: RunReport = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(loaded, report);
}

#[test]
fn mismatches_are_reported_not_raised() {
    let source = read_fixture("java/foo/bar/JavaNestedClasses.java").replace(
        "expectedFqClassNames: foo.bar.JavaNestedClasses$Inner}",
        "expectedFqClassNames: foo.bar.JavaNestedClasses$Outer}",
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("JavaNestedClasses.java");
    std::fs::write(&path, source).unwrap();

    let report = run(vec![path]);
    assert!(!report.is_success());
    assert_eq!(report.failed(), 1);

    let failures = report.failures();
    let (_, outcome) = failures[0];
    assert_eq!(outcome.reference, "METHOD|JavaNestedClasses$Inner#method");
    assert_eq!(outcome.verdict.mismatches()[0].field, VectorField::ContainingBinaryClassName);
    assert_eq!(outcome.verdict.mismatches()[0].expected, "foo.bar.JavaNestedClasses$Outer");
    assert_eq!(outcome.verdict.mismatches()[0].actual, "foo.bar.JavaNestedClasses$Inner");

    let md = MarkdownReporter::generate(&report);
    assert!(md.contains("foo.bar.JavaNestedClasses$Outer"));
}

#[test]
fn broken_file_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Broken.java"), "public class Broken {\n  void m( {\n}\n").unwrap();
    std::fs::copy(
        fixture_path("java/foo/bar/JavaNestedClasses.java"),
        dir.path().join("JavaNestedClasses.java"),
    )
    .unwrap();

    let report = run(vec![dir.path().to_path_buf()]);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].message.contains("Parse error"));
    assert_eq!(report.failed(), 0);
    assert!(!report.is_success());
}
