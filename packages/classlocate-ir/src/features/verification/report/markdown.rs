//! Markdown report generation

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::features::verification::RunReport;

pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn save(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join("report.md");
        std::fs::write(&path, Self::generate(report))?;
        Ok(path)
    }

    pub fn generate(report: &RunReport) -> String {
        format!(
            r#"# Binary Name Verification Report

**Status**: {}
**Duration**: {:.2}s

## Summary

| Metric | Value |
|--------|-------|
| Files | {} |
| Vectors | {} |
| Passed | {} |
| Failed | {} |
| Errors | {} |

## Files

| File | Vectors | Passed |
|------|---------|--------|
{}

## Failures

{}
"#,
            if report.is_success() { "✅ PASS" } else { "❌ FAIL" },
            report.duration.as_secs_f64(),
            report.files.len() + report.errors.len(),
            report.total(),
            report.passed(),
            report.failed(),
            report.errors.len(),
            Self::generate_file_rows(report),
            Self::generate_failures(report),
        )
    }

    fn generate_file_rows(report: &RunReport) -> String {
        report
            .files
            .iter()
            .map(|f| format!("| `{}` | {} | {} |", f.file_path, f.total(), f.passed()))
            .chain(
                report
                    .errors
                    .iter()
                    .map(|e| format!("| `{}` | error | - |", e.file_path)),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn generate_failures(report: &RunReport) -> String {
        if report.is_success() {
            return "None".to_string();
        }

        let mut lines = vec![
            "| Location | Reference | Field | Expected | Actual |".to_string(),
            "|----------|-----------|-------|----------|--------|".to_string(),
        ];
        for (file, outcome) in report.file_failures() {
            for m in outcome.verdict.mismatches() {
                lines.push(format!(
                    "| `{}:{}` | file | {} | `{}` | `{}` |",
                    file, outcome.line, m.field, m.expected, m.actual
                ));
            }
        }
        for (file, outcome) in report.failures() {
            for m in outcome.verdict.mismatches() {
                lines.push(format!(
                    "| `{}:{}` | `{}` | {} | `{}` | `{}` |",
                    file, outcome.line, outcome.reference, m.field, m.expected, m.actual
                ));
            }
        }
        for error in &report.errors {
            lines.push(format!(
                "| `{}` | - | error | - | {} |",
                error.file_path, error.message
            ));
        }
        lines.join("\n")
    }
}
