//! Terminal (pretty-print) report generation

use crate::features::verification::RunReport;

pub struct TerminalReporter;

impl TerminalReporter {
    pub fn print(report: &RunReport) {
        println!("\n┌──────────────────────────────────────────────────────────┐");
        println!("│ Binary Name Verification                                 │");
        println!("├──────────────────────────────────────────────────────────┤");
        println!(
            "│  Files:        {:<42}│",
            report.files.len() + report.errors.len()
        );
        println!("│  Vectors:      {:<42}│", report.total());
        println!("│  Passed:       {:<42}│", report.passed());
        println!("│  Failed:       {:<42}│", report.failed());
        println!("│  Errors:       {:<42}│", report.errors.len());
        println!(
            "│  Duration:     {:<42}│",
            format!("{:.2}s", report.duration.as_secs_f64())
        );
        println!("└──────────────────────────────────────────────────────────┘");

        if !report.is_success() {
            println!("\n┌──────────────────────────────────────────────────────────┐");
            println!("│ Failures                                                 │");
            println!("├──────────────────────────────────────────────────────────┤");
            for line in report.summary().lines().skip(2) {
                println!("│  {:<54}  │", line);
            }
            println!("└──────────────────────────────────────────────────────────┘");
        }
    }
}
