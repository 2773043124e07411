//! Test vector comments
//!
//! Fixture sources carry their expectations in line comments:
//!
//! ```text
//! // FileTestVector{baseFqClassNames: a.A, containingFqClassNames: a.A|a.A$Inner}
//! // PsiElementTestVector{reference: METHOD|A$Inner#run, baseFqClassName: a.A, expectedFqClassNames: a.A$Inner, sourceFileOnly: false}
//! ```
//!
//! The element under test is the innermost source node enclosing the comment;
//! the reference only labels the vector.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{LocateError, Result};
use crate::features::parsing::domain::ExecutableKind;

static FILE_VECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//\s*FileTestVector\{(.*)\}").expect("valid file vector regex"));

static ELEMENT_VECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*PsiElementTestVector\{(.*)\}").expect("valid element vector regex")
});

/// Kind prefix of a vector reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    Method,
    Lambda,
    Constructor,
    FieldInitializer,
}

impl ReferenceKind {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "METHOD" => Some(ReferenceKind::Method),
            "LAMBDA" => Some(ReferenceKind::Lambda),
            "CONSTRUCTOR" => Some(ReferenceKind::Constructor),
            "FIELD_INITIALIZER" => Some(ReferenceKind::FieldInitializer),
            _ => None,
        }
    }

    pub fn executable_kind(&self) -> ExecutableKind {
        match self {
            ReferenceKind::Method => ExecutableKind::Method,
            ReferenceKind::Lambda => ExecutableKind::Lambda,
            ReferenceKind::Constructor => ExecutableKind::Constructor,
            ReferenceKind::FieldInitializer => ExecutableKind::FieldInitializer,
        }
    }
}

/// `KIND|Owner$Path#member`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementReference {
    pub kind: ReferenceKind,
    pub owner_path: Vec<String>,
    pub member: String,
    pub raw: String,
}

impl ElementReference {
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let raw = text.trim();
        let (kind, target) = raw
            .split_once('|')
            .ok_or_else(|| format!("reference '{}' has no KIND| prefix", raw))?;
        let kind = ReferenceKind::parse(kind)
            .ok_or_else(|| format!("unknown reference kind '{}'", kind.trim()))?;

        let (owner, member) = target.split_once('#').unwrap_or((target, ""));
        let owner_path: Vec<String> = owner
            .split('$')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if owner_path.is_empty() {
            return Err(format!("reference '{}' has no owner type", raw));
        }

        Ok(Self {
            kind,
            owner_path,
            member: member.trim().to_string(),
            raw: raw.to_string(),
        })
    }

    pub fn owner_segments(&self) -> Vec<&str> {
        self.owner_path.iter().map(String::as_str).collect()
    }
}

impl std::fmt::Display for ElementReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Expectations about a whole file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTestVector {
    pub line: u32,
    pub base_fq_class_names: Vec<String>,
    pub containing_fq_class_names: Vec<String>,
}

/// Expectation about the element enclosing the comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTestVector {
    pub line: u32,
    /// Byte offset of the comment
    pub offset: usize,
    pub reference: ElementReference,
    pub base_fq_class_name: String,
    /// Candidate binary names; the actual one must be among them
    pub expected_fq_class_names: Vec<String>,
    /// Only the base class is compared
    pub source_file_only: bool,
}

/// All vectors found in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub file_path: String,
    pub file_vectors: Vec<FileTestVector>,
    pub element_vectors: Vec<ElementTestVector>,
}

impl Fixture {
    pub fn is_empty(&self) -> bool {
        self.file_vectors.is_empty() && self.element_vectors.is_empty()
    }

    pub fn vector_count(&self) -> usize {
        self.file_vectors.len() + self.element_vectors.len()
    }
}

/// Collect test vectors from source text
pub fn parse_fixture(source: &str, file_path: &str) -> Result<Fixture> {
    let mut fixture = Fixture {
        file_path: file_path.to_string(),
        ..Fixture::default()
    };

    for caps in FILE_VECTOR_RE.captures_iter(source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let line = line_of(source, whole.start());
        let fields = parse_marker(body.as_str())
            .map_err(|msg| LocateError::fixture(file_path, line, msg))?;

        fixture.file_vectors.push(FileTestVector {
            line,
            base_fq_class_names: split_names(required(&fields, "baseFqClassNames", file_path, line)?),
            containing_fq_class_names: split_names(
                fields.get("containingFqClassNames").map(String::as_str).unwrap_or(""),
            ),
        });
    }

    for caps in ELEMENT_VECTOR_RE.captures_iter(source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let line = line_of(source, whole.start());
        let fields = parse_marker(body.as_str())
            .map_err(|msg| LocateError::fixture(file_path, line, msg))?;

        let reference = ElementReference::parse(required(&fields, "reference", file_path, line)?)
            .map_err(|msg| LocateError::fixture(file_path, line, msg))?;
        let source_file_only = match fields.get("sourceFileOnly").map(String::as_str) {
            None | Some("false") => false,
            Some("true") => true,
            Some(other) => {
                return Err(LocateError::fixture(
                    file_path,
                    line,
                    format!("sourceFileOnly must be true or false, got '{}'", other),
                ))
            }
        };

        fixture.element_vectors.push(ElementTestVector {
            line,
            offset: whole.start(),
            reference,
            base_fq_class_name: required(&fields, "baseFqClassName", file_path, line)?.to_string(),
            expected_fq_class_names: split_names(required(
                &fields,
                "expectedFqClassNames",
                file_path,
                line,
            )?),
            source_file_only,
        });
    }

    Ok(fixture)
}

/// `key: value, key: value` with optional `[...]` around values
fn parse_marker(body: &str) -> std::result::Result<HashMap<String, String>, String> {
    let cleaned = body.replace(&['[', ']'][..], "");
    let mut fields = HashMap::new();
    for part in cleaned.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| format!("expected 'key: value', got '{}'", part.trim()))?;
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(fields)
}

fn required<'f>(
    fields: &'f HashMap<String, String>,
    key: &str,
    file_path: &str,
    line: u32,
) -> Result<&'f str> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| LocateError::fixture(file_path, line, format!("missing '{}'", key)))
}

/// `a|b||c` → `[a, b, c]`
fn split_names(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 1-based line of a byte offset
fn line_of(source: &str, offset: usize) -> u32 {
    source
        .get(..offset)
        .map(|prefix| prefix.matches('\n').count() as u32 + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_reference() {
        let reference = ElementReference::parse("METHOD|JavaNestedClasses$Inner$Record#method").unwrap();
        assert_eq!(reference.kind, ReferenceKind::Method);
        assert_eq!(reference.owner_segments(), vec!["JavaNestedClasses", "Inner", "Record"]);
        assert_eq!(reference.member, "method");
        assert_eq!(reference.to_string(), "METHOD|JavaNestedClasses$Inner$Record#method");
        assert_eq!(reference.kind.executable_kind(), ExecutableKind::Method);
    }

    #[test]
    fn test_parse_reference_errors() {
        assert!(ElementReference::parse("JavaNestedClasses#method").is_err());
        assert!(ElementReference::parse("MODULE_EXPORTS|foo.bar").is_err());
        assert!(ElementReference::parse("METHOD|#method").is_err());
    }

    #[test]
    fn test_parse_fixture_vectors() {
        let source = r#"// FileTestVector{baseFqClassNames: foo.A, containingFqClassNames: foo.A|foo.A$B }
package foo;

class A {
  void m() {
    // PsiElementTestVector{reference: METHOD|A#m, baseFqClassName: foo.A, expectedFqClassNames: foo.A}
  }
  void l() {
    // PsiElementTestVector{reference: LAMBDA|A#l, baseFqClassName: foo.A, expectedFqClassNames: [foo.A|foo.A$1], sourceFileOnly: true}
  }
}
"#;
        let fixture = parse_fixture(source, "A.java").unwrap();
        assert_eq!(fixture.vector_count(), 3);

        let file_vector = &fixture.file_vectors[0];
        assert_eq!(file_vector.line, 1);
        assert_eq!(file_vector.base_fq_class_names, vec!["foo.A"]);
        assert_eq!(file_vector.containing_fq_class_names, vec!["foo.A", "foo.A$B"]);

        let first = &fixture.element_vectors[0];
        assert_eq!(first.line, 6);
        assert!(!first.source_file_only);
        assert_eq!(first.expected_fq_class_names, vec!["foo.A"]);
        assert_eq!(&source[first.offset..first.offset + 2], "//");

        let second = &fixture.element_vectors[1];
        assert_eq!(second.reference.kind, ReferenceKind::Lambda);
        assert!(second.source_file_only);
        assert_eq!(second.expected_fq_class_names, vec!["foo.A", "foo.A$1"]);
    }

    #[test]
    fn test_missing_key_is_fixture_error() {
        let source = "// PsiElementTestVector{reference: METHOD|A#m, expectedFqClassNames: foo.A}\n";
        let err = parse_fixture(source, "A.java").unwrap_err();
        match err {
            LocateError::Fixture { line, message, .. } => {
                assert_eq!(line, 1);
                assert!(message.contains("baseFqClassName"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_bad_source_file_only() {
        let source = "// PsiElementTestVector{reference: METHOD|A#m, baseFqClassName: A, expectedFqClassNames: A, sourceFileOnly: yes}\n";
        assert!(matches!(
            parse_fixture(source, "A.java"),
            Err(LocateError::Fixture { .. })
        ));
    }

    #[test]
    fn test_source_without_vectors() {
        let fixture = parse_fixture("class A {}\n", "A.java").unwrap();
        assert!(fixture.is_empty());
    }

    #[test]
    fn test_names_with_spaces() {
        assert_eq!(
            split_names("a.B$method with spaces$1| a.B |"),
            vec!["a.B$method with spaces$1", "a.B"]
        );
    }
}
