//! Language identifiers

use serde::{Deserialize, Serialize};

/// Language identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Java,
    Kotlin,
}

impl LanguageId {
    /// Get language name as string
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Java => "java",
            LanguageId::Kotlin => "kotlin",
        }
    }

    /// Get language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "java" => Some(LanguageId::Java),
            "kt" | "kts" => Some(LanguageId::Kotlin),
            _ => None,
        }
    }

    /// Get language from a file path's extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get supported file extensions
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageId::Java => &["java"],
            LanguageId::Kotlin => &["kt", "kts"],
        }
    }

    /// All supported languages
    pub fn all() -> &'static [LanguageId] {
        &[LanguageId::Java, LanguageId::Kotlin]
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
