//! Common test utilities for classlocate-ir
//!
//! Fixture paths, source builders and resolution assertions shared by the
//! integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use classlocate_ir::{parse_source, BinaryNameResolver, ResolutionResult, SourceModel};
use pretty_assertions::assert_eq;

/// Absolute path of a file under `tests/fixtures`
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Root of the Java or Kotlin fixture tree
pub fn fixture_root(language: &str) -> PathBuf {
    fixture_path(language)
}

pub fn read_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative))
        .unwrap_or_else(|e| panic!("cannot read fixture {relative}: {e}"))
}

pub fn model_of(source: &str, file_path: &str) -> SourceModel {
    parse_source(source, file_path)
        .unwrap_or_else(|e| panic!("cannot parse {file_path}: {e}"))
}

/// Resolve the innermost element enclosing the first occurrence of `marker`
pub fn resolve_marker(model: &SourceModel, source: &str, marker: &str) -> ResolutionResult {
    let offset = source
        .find(marker)
        .unwrap_or_else(|| panic!("marker '{marker}' not in source"));
    BinaryNameResolver::new(model)
        .resolve_at(offset)
        .unwrap_or_else(|e| panic!("cannot resolve '{marker}': {e}"))
}

pub fn assert_resolution(actual: &ResolutionResult, base: &str, containing: &str) {
    assert_eq!(
        (
            actual.base_fq_class_name.as_str(),
            actual.containing_binary_class_name.as_str()
        ),
        (base, containing)
    );
}

/// Java class nesting `names` inside each other, with a marked method in the innermost one
pub fn nested_java_source(package: &str, names: &[String]) -> String {
    let mut source = format!("package {package};\n\n");
    for (depth, name) in names.iter().enumerate() {
        let indent = "  ".repeat(depth);
        let keyword = if depth == 0 { "public class" } else { "static class" };
        source.push_str(&format!("{indent}{keyword} {name} {{\n"));
    }
    let indent = "  ".repeat(names.len());
    source.push_str(&format!(
        "{indent}void marked() {{\n{indent}  Runnable r = () -> {{ int inLambda = 1; }};\n{indent}}}\n"
    ));
    for depth in (0..names.len()).rev() {
        source.push_str(&format!("{}}}\n", "  ".repeat(depth)));
    }
    source
}
