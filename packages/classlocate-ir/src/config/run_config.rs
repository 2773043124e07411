//! Run configuration and its YAML schema

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::features::parsing::domain::LanguageId;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/classlocate")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfigV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    pub version: Option<u32>,

    /// Directories or files scanned for fixtures
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub threads: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub report: Option<ReportConfig>,
}

/// Validated run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub roots: Vec<PathBuf>,
    pub extensions: Vec<String>,
    /// Worker count; `None` uses 75% of available cores
    pub threads: Option<usize>,
    pub report: ReportConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            extensions: default_extensions(),
            threads: None,
            report: ReportConfig::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    LanguageId::all()
        .iter()
        .flat_map(|l| l.extensions().iter().map(|e| e.to_string()))
        .collect()
}

impl RunConfig {
    /// Configuration scanning the given roots with defaults for everything else
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn format(mut self, format: ReportFormat) -> Self {
        self.report.format = format;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report.output_dir = dir.into();
        self
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: RunConfigV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            roots: export.roots,
            extensions: export.extensions.unwrap_or_else(default_extensions),
            threads: export.threads,
            report: export.report.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = RunConfigV1 {
            version: Some(1),
            roots: self.roots.clone(),
            extensions: Some(self.extensions.clone()),
            threads: self.threads,
            report: Some(self.report.clone()),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.roots.is_empty() {
            return Err(ConfigError::Validation(
                "at least one root is required".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "at least one extension is required".to_string(),
            ));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| LanguageId::from_extension(e).is_none())
        {
            return Err(ConfigError::UnknownExtension(ext.clone()));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Validation(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a path has one of the configured extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Get a human-readable description of the configuration
    pub fn describe(&self) -> String {
        let roots: Vec<String> = self
            .roots
            .iter()
            .map(|r| r.display().to_string())
            .collect();
        format!(
            "roots: [{}], extensions: [{}], threads: {}, report: {:?} -> {}",
            roots.join(", "),
            self.extensions.join(", "),
            self.threads
                .map(|t| t.to_string())
                .unwrap_or_else(|| "auto".to_string()),
            self.report.format,
            self.report.output_dir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_yaml_roundtrip() {
        let config = RunConfig::with_roots(vec![PathBuf::from("fixtures")])
            .threads(2)
            .format(ReportFormat::Json);

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("format: json"));
        assert!(yaml.contains("threads: 2"));

        let loaded = RunConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
roots:
  - testProject/src/main/java
extensions: [java]
report:
  format: markdown
  output_dir: out
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = RunConfig::from_yaml(file.path()).unwrap();
        assert_eq!(config.roots, vec![PathBuf::from("testProject/src/main/java")]);
        assert_eq!(config.extensions, vec!["java".to_string()]);
        assert_eq!(config.threads, None);
        assert_eq!(config.report.format, ReportFormat::Markdown);
        assert_eq!(config.report.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_defaults_when_omitted() {
        let config = RunConfig::from_yaml_str("version: 1\nroots: [src]\n").unwrap();
        assert_eq!(config.extensions, vec!["java", "kt", "kts"]);
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_missing_version() {
        let err = RunConfig::from_yaml_str("roots: [src]\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_unsupported_version() {
        let err = RunConfig::from_yaml_str("version: 2\nroots: [src]\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RunConfig::from_yaml_str("version: 1\nroots: [src]\npreset: fast\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            RunConfig::from_yaml_str("version: 1\nroots: []\n"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            RunConfig::from_yaml_str("version: 1\nroots: [src]\nextensions: [py]\n"),
            Err(ConfigError::UnknownExtension(ext)) if ext == "py"
        ));
        assert!(matches!(
            RunConfig::from_yaml_str("version: 1\nroots: [src]\nthreads: 0\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_accepts_extension() {
        let config = RunConfig::default();
        assert!(config.accepts(Path::new("a/B.java")));
        assert!(config.accepts(Path::new("a/B.KT")));
        assert!(!config.accepts(Path::new("a/B.py")));
        assert!(!config.accepts(Path::new("README")));
    }
}
