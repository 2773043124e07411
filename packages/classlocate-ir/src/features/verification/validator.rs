//! Vector validation
//!
//! Compares resolver output against expected vectors. A mismatch is a
//! reported verdict, never an error; every mismatched field is listed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::fixture::{ElementTestVector, FileTestVector};
use crate::features::resolution::{BinaryName, ResolutionResult};

/// Field of a vector that can mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorField {
    BaseFqClassName,
    ContainingBinaryClassName,
    BaseFqClassNames,
    ContainingFqClassNames,
}

impl VectorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorField::BaseFqClassName => "baseFqClassName",
            VectorField::ContainingBinaryClassName => "expectedFqClassNames",
            VectorField::BaseFqClassNames => "baseFqClassNames",
            VectorField::ContainingFqClassNames => "containingFqClassNames",
        }
    }
}

impl std::fmt::Display for VectorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single field mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMismatch {
    pub field: VectorField,
    pub expected: String,
    pub actual: String,
}

/// Outcome of one vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "mismatches", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail(Vec<FieldMismatch>),
}

impl Verdict {
    fn from_mismatches(mismatches: Vec<FieldMismatch>) -> Self {
        if mismatches.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail(mismatches)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn mismatches(&self) -> &[FieldMismatch] {
        match self {
            Verdict::Pass => &[],
            Verdict::Fail(m) => m,
        }
    }
}

/// Expected resolution of one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedResolution {
    pub base_fq_class_name: String,
    /// Acceptable containing binary names (one is the common case)
    pub containing_candidates: Vec<String>,
    pub source_file_only: bool,
}

impl ExpectedResolution {
    pub fn new(base: impl Into<String>, containing: impl Into<String>) -> Self {
        Self {
            base_fq_class_name: base.into(),
            containing_candidates: vec![containing.into()],
            source_file_only: false,
        }
    }

    pub fn source_file_only(mut self, value: bool) -> Self {
        self.source_file_only = value;
        self
    }
}

impl From<&ElementTestVector> for ExpectedResolution {
    fn from(vector: &ElementTestVector) -> Self {
        Self {
            base_fq_class_name: vector.base_fq_class_name.clone(),
            containing_candidates: vector.expected_fq_class_names.clone(),
            source_file_only: vector.source_file_only,
        }
    }
}

/// Compare an expected resolution with an actual one
pub fn verify(expected: &ExpectedResolution, actual: &ResolutionResult) -> Verdict {
    let mut mismatches = Vec::new();

    if expected.base_fq_class_name != actual.base_fq_class_name {
        mismatches.push(FieldMismatch {
            field: VectorField::BaseFqClassName,
            expected: expected.base_fq_class_name.clone(),
            actual: actual.base_fq_class_name.clone(),
        });
    }

    if !expected.source_file_only
        && !expected
            .containing_candidates
            .iter()
            .any(|c| *c == actual.containing_binary_class_name)
    {
        mismatches.push(FieldMismatch {
            field: VectorField::ContainingBinaryClassName,
            expected: expected.containing_candidates.join("|"),
            actual: actual.containing_binary_class_name.clone(),
        });
    }

    Verdict::from_mismatches(mismatches)
}

/// Check a file vector against the file's declared binary classes
///
/// Base names must equal the set of top-level classes; every listed
/// containing name must be declared somewhere in the file.
pub fn verify_file(
    expected: &FileTestVector,
    top_level: &[BinaryName],
    declared: &[BinaryName],
) -> Verdict {
    let mut mismatches = Vec::new();

    let expected_base: BTreeSet<&str> = expected
        .base_fq_class_names
        .iter()
        .map(String::as_str)
        .collect();
    let actual_base: BTreeSet<String> = top_level.iter().map(BinaryName::qualified).collect();
    let actual_base_refs: BTreeSet<&str> = actual_base.iter().map(String::as_str).collect();
    if expected_base != actual_base_refs {
        mismatches.push(FieldMismatch {
            field: VectorField::BaseFqClassNames,
            expected: join_set(&expected_base),
            actual: join_set(&actual_base_refs),
        });
    }

    let declared: BTreeSet<String> = declared.iter().map(BinaryName::qualified).collect();
    let missing: BTreeSet<&str> = expected
        .containing_fq_class_names
        .iter()
        .map(String::as_str)
        .filter(|name| !declared.contains(*name))
        .collect();
    if !missing.is_empty() {
        let declared_refs: BTreeSet<&str> = declared.iter().map(String::as_str).collect();
        mismatches.push(FieldMismatch {
            field: VectorField::ContainingFqClassNames,
            expected: join_set(&missing),
            actual: join_set(&declared_refs),
        });
    }

    Verdict::from_mismatches(mismatches)
}

fn join_set(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join("|")
}
