//! Language Plugin Port
//!
//! Defines the contract for language-specific source model extraction.
//! Each language (Java, Kotlin) implements this trait.

use std::collections::HashMap;
use tree_sitter::{Language as TSLanguage, Node as TSNode, Tree};

use crate::errors::Result;
use crate::features::parsing::domain::{
    ExecutableUnit, LanguageId, Locality, NodeId, SourceModel, SourceNode, SyntheticNames,
    TypeDeclaration,
};
use crate::shared::models::Span;
use crate::shared::utils::ScopeStack;

/// Extraction context passed to extractors
///
/// Owns the model under construction and tracks the enclosing type and
/// executable stacks during traversal. Both stacks may be non-empty at once.
pub struct ExtractionContext<'a> {
    /// Source code
    pub source: &'a str,
    /// File path
    pub file_path: &'a str,
    /// Language being parsed
    pub language: LanguageId,
    /// Model being built
    pub model: SourceModel,
    /// Ordinal counters for anonymous and local classes
    pub synthetic_names: SyntheticNames,
    /// Enclosing type declarations, innermost last
    type_stack: Vec<NodeId>,
    /// Enclosing executable units, innermost last
    executable_stack: Vec<NodeId>,
    /// Naming segments contributed by enclosing functions/properties (Kotlin)
    name_prefix: ScopeStack,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(source: &'a str, file_path: &'a str, language: LanguageId) -> Self {
        Self {
            source,
            file_path,
            language,
            model: SourceModel::new(file_path, language),
            synthetic_names: SyntheticNames::new(),
            type_stack: Vec::new(),
            executable_stack: Vec::new(),
            name_prefix: ScopeStack::new(),
        }
    }

    /// Innermost enclosing node of either kind
    pub fn current_parent(&self) -> Option<NodeId> {
        // Ids grow with depth, so the larger top is the innermost.
        match (self.type_stack.last(), self.executable_stack.last()) {
            (Some(t), Some(e)) => Some(*t.max(e)),
            (Some(t), None) => Some(*t),
            (None, Some(e)) => Some(*e),
            (None, None) => None,
        }
    }

    /// Innermost enclosing type declaration
    pub fn enclosing_type(&self) -> Option<NodeId> {
        self.type_stack.last().copied()
    }

    /// Declared name of the innermost enclosing type
    pub fn enclosing_type_name(&self) -> Option<&str> {
        let id = self.enclosing_type()?;
        self.model.get_type(id)?.declared_name.as_deref()
    }

    /// Locality of a named type declared at the current position
    pub fn locality_here(&self) -> Locality {
        match self.current_parent().and_then(|id| self.model.get(id)) {
            None => Locality::TopLevel,
            Some(SourceNode::Type(_)) => Locality::Member,
            Some(SourceNode::Executable(_)) => Locality::Local,
        }
    }

    /// Whether traversal is currently inside executable code of the innermost type
    pub fn in_executable(&self) -> bool {
        matches!(self.locality_here(), Locality::Local)
    }

    /// Add a type declaration under the current parent and enter it
    pub fn push_type(&mut self, decl: TypeDeclaration) -> NodeId {
        let id = self.model.add_type(self.current_parent(), decl);
        self.type_stack.push(id);
        id
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop();
    }

    /// Add an executable unit under the current parent and enter it
    pub fn push_executable(&mut self, unit: ExecutableUnit) -> NodeId {
        let id = self.model.add_executable(self.current_parent(), unit);
        self.executable_stack.push(id);
        id
    }

    pub fn pop_executable(&mut self) {
        self.executable_stack.pop();
    }

    /// Next anonymous/local ordinal for `key` within the innermost type
    pub fn next_ordinal(&mut self, key: &str) -> u32 {
        let owner = self.enclosing_type();
        self.synthetic_names.next_ordinal(owner, key)
    }

    pub fn push_name_segment(&mut self, segment: impl Into<String>) {
        self.name_prefix.push(segment.into());
    }

    pub fn pop_name_segment(&mut self) {
        self.name_prefix.pop();
    }

    /// Joined naming segments, empty when directly inside a type body
    pub fn name_prefix(&self) -> String {
        self.name_prefix.joined()
    }

    /// `prefix$name`, or `name` when there is no prefix
    pub fn prefixed(&self, name: &str) -> String {
        self.name_prefix.joined_with(name)
    }

    /// Clear naming segments on entering a type body, returning the saved ones
    pub fn take_name_prefix(&mut self) -> ScopeStack {
        self.name_prefix.take()
    }

    pub fn restore_name_prefix(&mut self, saved: ScopeStack) {
        self.name_prefix = saved;
    }

    /// Get node text from tree-sitter node
    pub fn node_text(&self, node: &TSNode) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Finish extraction
    pub fn into_result(self) -> ExtractionResult {
        ExtractionResult {
            model: self.model,
            warnings: Vec::new(),
        }
    }
}

/// Result of extraction from a single file
#[derive(Debug)]
pub struct ExtractionResult {
    /// Extracted model
    pub model: SourceModel,
    /// Non-fatal oddities noticed during extraction
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Language Plugin trait
///
/// Each supported language implements this trait to provide:
/// - Tree-sitter grammar
/// - Source model extraction logic
pub trait LanguagePlugin: Send + Sync {
    /// Get the tree-sitter language
    fn tree_sitter_language(&self) -> TSLanguage;

    /// Get the language identifier
    fn language_id(&self) -> LanguageId;

    /// Get supported file extensions
    fn extensions(&self) -> &[&str] {
        self.language_id().extensions()
    }

    /// Check if this plugin supports a file extension
    fn supports(&self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Extract the source model from a parsed tree
    fn extract(&self, ctx: ExtractionContext, tree: &Tree) -> Result<ExtractionResult>;
}

/// Registry for language plugins
pub struct LanguageRegistry {
    plugins: HashMap<LanguageId, Box<dyn LanguagePlugin>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a language plugin
    pub fn register(&mut self, plugin: Box<dyn LanguagePlugin>) {
        self.plugins.insert(plugin.language_id(), plugin);
    }

    /// Get plugin by language ID
    pub fn get(&self, lang: LanguageId) -> Option<&dyn LanguagePlugin> {
        self.plugins.get(&lang).map(|p| p.as_ref())
    }

    /// Get plugin by file extension
    pub fn get_by_extension(&self, ext: &str) -> Option<&dyn LanguagePlugin> {
        let lang = LanguageId::from_extension(ext)?;
        self.get(lang)
    }

    /// Get all registered plugins
    pub fn all(&self) -> impl Iterator<Item = &dyn LanguagePlugin> {
        self.plugins.values().map(|p| p.as_ref())
    }

    /// Check if any plugin supports the extension
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper trait for extracting spans from tree-sitter nodes
pub trait SpanExt {
    fn to_span(&self) -> Span;
}

impl SpanExt for TSNode<'_> {
    fn to_span(&self) -> Span {
        Span::new(
            self.start_position().row as u32 + 1,
            self.start_position().column as u32,
            self.end_position().row as u32 + 1,
            self.end_position().column as u32,
        )
        .with_bytes(self.start_byte(), self.end_byte())
    }
}
