//! Resolution result

use serde::{Deserialize, Serialize};

use super::BinaryName;

/// Base class and binary container class of one source element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Outermost declared type of the file containing the element
    pub base_fq_class_name: String,
    /// Binary class whose compiled code contains the element
    pub containing_binary_class_name: String,
}

impl ResolutionResult {
    pub fn new(base: &BinaryName, containing: &BinaryName) -> Self {
        Self {
            base_fq_class_name: base.qualified(),
            containing_binary_class_name: containing.qualified(),
        }
    }

    /// Element compiles directly into the file's base class
    pub fn is_base(&self) -> bool {
        self.base_fq_class_name == self.containing_binary_class_name
    }

    /// Relative path of the containing class file
    pub fn class_file_path(&self) -> String {
        BinaryName::parse(&self.containing_binary_class_name).class_file_path()
    }
}

impl std::fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "base={} containing={}",
            self.base_fq_class_name, self.containing_binary_class_name
        )
    }
}
