//! Binary class names
//!
//! A binary name is never stored as source truth; it is re-derived from the
//! chain of enclosing type declarations each time it is needed.

use serde::{Deserialize, Serialize};

use crate::features::parsing::domain::TypeDeclaration;
use crate::shared::utils::ScopeStack;

/// Package plus `$`-separated type segments, e.g. `foo.bar.Outer$Inner$1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinaryName {
    pub package: Option<String>,
    pub segments: Vec<String>,
}

impl BinaryName {
    /// Build from a declaration chain ordered outermost first
    pub fn from_chain(package: Option<&str>, chain: &[&TypeDeclaration]) -> Option<Self> {
        if chain.is_empty() {
            return None;
        }
        Some(Self {
            package: package.filter(|p| !p.is_empty()).map(str::to_string),
            segments: chain.iter().map(|t| t.binary_name.clone()).collect(),
        })
    }

    /// Split a fully-qualified binary name at its last `.`
    pub fn parse(fq_name: &str) -> Self {
        let fq_name = fq_name.trim();
        let (package, class_part) = match fq_name.rfind('.') {
            Some(idx) => (Some(fq_name[..idx].to_string()), &fq_name[idx + 1..]),
            None => (None, fq_name),
        };
        Self {
            package,
            segments: class_part.split('$').map(str::to_string).collect(),
        }
    }

    /// Fully-qualified binary name
    pub fn qualified(&self) -> String {
        let stack: ScopeStack = self.segments.iter().cloned().collect();
        stack.qualified(self.package.as_deref())
    }

    /// Binary name without the package
    pub fn simple(&self) -> String {
        self.segments.join("$")
    }

    /// Name of the outermost declared type
    pub fn outermost(&self) -> Self {
        Self {
            package: self.package.clone(),
            segments: self.segments.iter().take(1).cloned().collect(),
        }
    }

    /// Number of `$` separated segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// Relative path of the compiled class file, e.g. `foo/bar/Outer$Inner.class`
    pub fn class_file_path(&self) -> String {
        match self.package.as_deref() {
            Some(pkg) => format!("{}/{}.class", pkg.replace('.', "/"), self.simple()),
            None => format!("{}.class", self.simple()),
        }
    }
}

impl std::fmt::Display for BinaryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qualified())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::domain::{Locality, TypeKind};
    use crate::shared::models::Span;

    #[test]
    fn test_from_chain() {
        let outer = TypeDeclaration::new(TypeKind::Class, "Outer", Span::zero());
        let anon =
            TypeDeclaration::new(TypeKind::Class, "1", Span::zero()).with_locality(Locality::Anonymous);
        let name = BinaryName::from_chain(Some("foo.bar"), &[&outer, &anon]).unwrap();
        assert_eq!(name.qualified(), "foo.bar.Outer$1");
        assert_eq!(name.outermost().qualified(), "foo.bar.Outer");
        assert_eq!(name.depth(), 2);
        assert!(BinaryName::from_chain(Some("foo"), &[]).is_none());
    }

    #[test]
    fn test_default_package() {
        let outer = TypeDeclaration::new(TypeKind::Class, "Outer", Span::zero());
        let name = BinaryName::from_chain(Some(""), &[&outer]).unwrap();
        assert_eq!(name.qualified(), "Outer");
        assert_eq!(name.class_file_path(), "Outer.class");
        assert!(name.is_top_level());
    }

    #[test]
    fn test_parse_and_class_file_path() {
        let name = BinaryName::parse("foo.bar.JavaNestedClasses$Inner$Record");
        assert_eq!(name.package.as_deref(), Some("foo.bar"));
        assert_eq!(name.segments, vec!["JavaNestedClasses", "Inner", "Record"]);
        assert_eq!(
            name.class_file_path(),
            "foo/bar/JavaNestedClasses$Inner$Record.class"
        );
        assert_eq!(name.to_string(), "foo.bar.JavaNestedClasses$Inner$Record");
    }

    #[test]
    fn test_parse_kotlin_segment_with_spaces() {
        let name = BinaryName::parse("foo.Outer$method with spaces$1");
        assert_eq!(name.segments, vec!["Outer", "method with spaces", "1"]);
        assert_eq!(name.simple(), "Outer$method with spaces$1");
    }
}
