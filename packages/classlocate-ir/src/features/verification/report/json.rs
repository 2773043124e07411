//! JSON report generation

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::features::verification::RunReport;

pub struct JsonReporter;

impl JsonReporter {
    pub fn save(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join("result.json");
        std::fs::write(&path, Self::generate(report)?)?;
        Ok(path)
    }

    pub fn generate(report: &RunReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::verification::FixtureRunner;
    use std::time::Duration;

    #[test]
    fn test_save_json() {
        let file = FixtureRunner::process_source(
            "class A {\n  void m() {\n    // PsiElementTestVector{reference: METHOD|A#m, baseFqClassName: A, expectedFqClassNames: A}\n  }\n}\n",
            "A.java",
        )
        .unwrap();
        let report = RunReport::aggregate(vec![Ok(file)], Duration::from_millis(1));

        let dir = tempfile::tempdir().unwrap();
        let path = JsonReporter::save(&report, &dir.path().join("out")).unwrap();
        assert!(path.ends_with("result.json"));

        let loaded: RunReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, report);

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["files"][0]["vectors"][0]["verdict"]["status"], "pass");
    }
}
