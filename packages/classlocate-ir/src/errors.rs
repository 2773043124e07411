//! Error types for classlocate-ir
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for classlocate-ir operations
#[derive(Debug, Error)]
pub enum LocateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source could not be decomposed into declarations
    #[error("Parse error in {file} at {line}:{column}: {message}")]
    Parse {
        file: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// No enclosing type declaration could be found for an element
    #[error("Unresolved element {element} in {file}: {context}")]
    UnresolvedElement {
        file: String,
        element: String,
        context: String,
    },

    /// Malformed test vector comment
    #[error("Invalid test vector in {file} at line {line}: {message}")]
    Fixture {
        file: String,
        line: u32,
        message: String,
    },

    /// No language plugin for the file
    #[error("Unsupported language for file: {0}")]
    UnsupportedLanguage(String),

    /// Tree-sitter grammar could not be loaded
    #[error("Language error: {0}")]
    Language(String),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LocateError {
    /// Create a parse error
    pub fn parse(
        file: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        LocateError::Parse {
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an unresolved element error
    pub fn unresolved(
        file: impl Into<String>,
        element: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        LocateError::UnresolvedElement {
            file: file.into(),
            element: element.into(),
            context: context.into(),
        }
    }

    /// Create a fixture error
    pub fn fixture(file: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        LocateError::Fixture {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        LocateError::Config(ConfigError::Validation(msg.into()))
    }
}

/// Result type alias for classlocate operations
pub type Result<T> = std::result::Result<T, LocateError>;
