//! Scope stack for binary name segments
//!
//! Holds `$`-joined segments: type chains (`Outer$Inner$1`) and the
//! function/property prefix kotlinc puts in front of local class names.

const BINARY_SEPARATOR: &str = "$";

/// Stack of name segments joined with `$`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeStack {
    scopes: Vec<String>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a new scope
    pub fn push(&mut self, name: impl Into<String>) {
        self.scopes.push(name.into());
    }

    /// Pop the current scope
    pub fn pop(&mut self) -> Option<String> {
        self.scopes.pop()
    }

    /// Segments joined with `$`
    pub fn joined(&self) -> String {
        self.scopes.join(BINARY_SEPARATOR)
    }

    /// Joined segments with `name` appended, or `name` alone when empty
    pub fn joined_with(&self, name: &str) -> String {
        if self.scopes.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", self.joined(), BINARY_SEPARATOR, name)
        }
    }

    /// Joined segments prefixed by a dotted package
    pub fn qualified(&self, package: Option<&str>) -> String {
        match package {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg, self.joined()),
            _ => self.joined(),
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Innermost segment
    pub fn current(&self) -> Option<&str> {
        self.scopes.last().map(|s| s.as_str())
    }

    /// Outermost segment
    pub fn root(&self) -> Option<&str> {
        self.scopes.first().map(|s| s.as_str())
    }

    /// Take every segment, leaving the stack empty
    pub fn take(&mut self) -> ScopeStack {
        std::mem::take(self)
    }
}

impl FromIterator<String> for ScopeStack {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            scopes: iter.into_iter().collect(),
        }
    }
}
