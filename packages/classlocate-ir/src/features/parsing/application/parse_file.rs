//! Parse file use case
//!
//! Source text → syntax tree → SourceModel.

use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::errors::{LocateError, Result};
use crate::features::parsing::domain::{LanguageId, SourceModel};
use crate::features::parsing::infrastructure::TreeSitterParser;
use crate::features::parsing::plugins::create_full_registry;
use crate::features::parsing::ports::{ExtractionContext, LanguageRegistry};

static DEFAULT_REGISTRY: Lazy<LanguageRegistry> = Lazy::new(create_full_registry);

/// Parse file use case
pub struct ParseFileUseCase<'r> {
    registry: &'r LanguageRegistry,
}

impl<'r> ParseFileUseCase<'r> {
    pub fn new(registry: &'r LanguageRegistry) -> Self {
        Self { registry }
    }

    /// Execute with the language taken from the file extension
    pub fn execute(&self, source: &str, file_path: &str) -> Result<SourceModel> {
        let language = LanguageId::from_path(Path::new(file_path))
            .ok_or_else(|| LocateError::UnsupportedLanguage(file_path.to_string()))?;
        self.execute_as(source, file_path, language)
    }

    /// Execute with an explicit language
    pub fn execute_as(
        &self,
        source: &str,
        file_path: &str,
        language: LanguageId,
    ) -> Result<SourceModel> {
        let plugin = self
            .registry
            .get(language)
            .ok_or_else(|| LocateError::UnsupportedLanguage(file_path.to_string()))?;

        let tree = TreeSitterParser::for_plugin(plugin).parse(source, file_path)?;
        let ctx = ExtractionContext::new(source, file_path, language);
        let result = plugin.extract(ctx, &tree)?;

        for warning in &result.warnings {
            warn!(file = file_path, "{}", warning);
        }
        debug!(
            file = file_path,
            language = %language,
            nodes = result.model.len(),
            "Built source model"
        );
        Ok(result.model)
    }

    /// Execute for multiple (path, source) pairs
    pub fn execute_batch(&self, files: &[(String, String)]) -> Vec<Result<SourceModel>> {
        files
            .iter()
            .map(|(path, source)| self.execute(source, path))
            .collect()
    }
}

/// Build the source model of in-memory source text
pub fn parse_source(source: &str, file_path: &str) -> Result<SourceModel> {
    ParseFileUseCase::new(&DEFAULT_REGISTRY).execute(source, file_path)
}

/// Read and build the source model of a file on disk
pub fn parse_file(path: &Path) -> Result<SourceModel> {
    let source = std::fs::read_to_string(path)?;
    parse_source(&source, &path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::plugins::create_registry;

    #[test]
    fn test_execute_by_extension() {
        let model = parse_source("package a;\nclass B {}\n", "a/B.java").unwrap();
        assert_eq!(model.language, LanguageId::Java);
        assert_eq!(model.package.as_deref(), Some("a"));
        assert_eq!(model.top_level_types().count(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_source("print(1)", "script.py").unwrap_err();
        assert!(matches!(err, LocateError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_unregistered_language() {
        let registry = create_registry(&[LanguageId::Java]);
        let use_case = ParseFileUseCase::new(&registry);
        let err = use_case.execute("class A", "A.kt").unwrap_err();
        assert!(matches!(err, LocateError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_malformed_source_is_parse_error() {
        let err = parse_source("class A { void m( }", "A.java").unwrap_err();
        assert!(matches!(err, LocateError::Parse { .. }));
    }

    #[test]
    fn test_execute_batch() {
        let registry = create_registry(&[LanguageId::Java]);
        let use_case = ParseFileUseCase::new(&registry);
        let results = use_case.execute_batch(&[
            ("A.java".to_string(), "class A {}".to_string()),
            ("B.java".to_string(), "class B {".to_string()),
        ]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_parse_file_reads_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C.java");
        std::fs::write(&path, "class C { void m() {} }").unwrap();
        let model = parse_file(&path).unwrap();
        assert_eq!(model.types().next().unwrap().binary_name, "C");
    }
}
