//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter parser lives. Grammars come from plugins.

use tracing::warn;
use tree_sitter::{Language as TSLanguage, Node as TSNode, Parser as TSParser, Tree};

use crate::errors::{LocateError, Result};
use crate::features::parsing::domain::LanguageId;
use crate::features::parsing::ports::{LanguagePlugin, SpanExt};
use crate::shared::models::Span;

/// Tokens that open a declaration; an ERROR node holding one has swallowed a header
const DECLARATION_TOKENS: &[&str] = &[
    "{", "}", "class", "interface", "enum", "record", "@interface", "object", "fun",
    "constructor", "init",
];

/// Syntax error found in a parsed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    /// Breaks declaration structure (unbalanced braces, swallowed headers)
    pub structural: bool,
}

/// Tree-sitter based parser
pub struct TreeSitterParser {
    language: TSLanguage,
    language_id: LanguageId,
}

impl TreeSitterParser {
    pub fn new(language: TSLanguage, language_id: LanguageId) -> Self {
        Self {
            language,
            language_id,
        }
    }

    /// Parser using a plugin's grammar
    pub fn for_plugin(plugin: &dyn LanguagePlugin) -> Self {
        Self::new(plugin.tree_sitter_language(), plugin.language_id())
    }

    pub fn language_id(&self) -> LanguageId {
        self.language_id
    }

    /// Parse source into a syntax tree
    ///
    /// Structural errors fail the whole file. Other errors are logged and the
    /// recovered tree is kept.
    pub fn parse(&self, source: &str, file_path: &str) -> Result<Tree> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| LocateError::Language(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| LocateError::parse(file_path, 0, 0, "Failed to parse source code"))?;

        let (structural, recoverable): (Vec<_>, Vec<_>) = Self::collect_errors(&tree, source)
            .into_iter()
            .partition(|e| e.structural);

        for error in &recoverable {
            warn!(
                file = file_path,
                line = error.span.start_line,
                column = error.span.start_col,
                "Recovered syntax error: {}",
                error.message
            );
        }

        if let Some(first) = structural.first() {
            let message = if structural.len() > 1 {
                format!("{} (and {} more)", first.message, structural.len() - 1)
            } else {
                first.message.clone()
            };
            return Err(LocateError::parse(
                file_path,
                first.span.start_line,
                first.span.start_col,
                message,
            ));
        }

        Ok(tree)
    }

    /// Collect parse errors in document order
    pub fn collect_errors(tree: &Tree, source: &str) -> Vec<SyntaxError> {
        let mut errors = Vec::new();
        Self::collect_node_errors(&tree.root_node(), source, &mut errors);
        errors
    }

    fn collect_node_errors(node: &TSNode, source: &str, errors: &mut Vec<SyntaxError>) {
        if node.is_missing() {
            errors.push(SyntaxError {
                message: format!("missing {}", node.kind()),
                span: node.to_span(),
                structural: node.kind() == "}",
            });
        } else if node.is_error() {
            let text = source.get(node.byte_range()).unwrap_or("");
            let snippet: String = text.chars().take(40).collect();
            errors.push(SyntaxError {
                message: format!("unexpected '{}'", snippet.trim()),
                span: node.to_span(),
                structural: Self::swallows_declaration(node),
            });
        }

        if !node.has_error() {
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::collect_node_errors(&child, source, errors);
        }
    }

    /// ERROR node with a brace or declaration keyword as a bare token
    fn swallows_declaration(node: &TSNode) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|c| !c.is_named() && DECLARATION_TOKENS.contains(&c.kind()));
        found
    }
}
