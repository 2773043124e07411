//! Kotlin Language Plugin
//!
//! Implements LanguagePlugin for Kotlin source code.
//! Supports: classes, interfaces, objects, companion objects, enum entries with bodies,
//! object literals, local classes, functions, constructors, init blocks, property
//! initializers, lambda literals and anonymous functions
//!
//! Synthetic names follow kotlinc: code inside a function or property initializer
//! contributes its name as a prefix (`fn$Local`, `fn$prop$1`). Object literals and
//! lambdas share one counter per (enclosing type, prefix), and a lambda adds its
//! number to the prefix (`fn$1$1` for an object inside the first lambda).

use tree_sitter::{Language as TSLanguage, Node as TSNode, Tree};

use crate::errors::Result;
use crate::features::parsing::domain::{
    ExecutableKind, ExecutableUnit, Locality, SourceNode, TypeDeclaration, TypeKind,
};
use crate::features::parsing::ports::{
    ExtractionContext, ExtractionResult, LanguageId, LanguagePlugin, SpanExt,
};

const DEFAULT_COMPANION_NAME: &str = "Companion";

/// Kotlin language plugin
pub struct KotlinPlugin;

impl KotlinPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Extract class / interface declaration
    fn extract_class(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let name = self.get_type_name(node, ctx);
        if name.is_empty() {
            return;
        }
        let kind = self.determine_class_kind(node, ctx);
        self.extract_named_type(ctx, node, name, kind);
    }

    /// Extract `object Foo` / `companion object`
    fn extract_object(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut name = self.get_type_name(node, ctx);
        if name.is_empty() {
            if node.kind() != "companion_object" {
                return;
            }
            name = DEFAULT_COMPANION_NAME.to_string();
        }
        self.extract_named_type(ctx, node, name, TypeKind::Object);
    }

    fn extract_named_type(
        &self,
        ctx: &mut ExtractionContext,
        node: &TSNode,
        name: String,
        kind: TypeKind,
    ) {
        let locality = ctx.locality_here();
        let binary_name = match locality {
            Locality::Local => ctx.prefixed(&name),
            _ => name.clone(),
        };

        let decl = TypeDeclaration::new(kind, binary_name, node.to_span())
            .with_declared_name(name)
            .with_locality(locality);
        self.extract_type_body(ctx, node, decl);
    }

    /// Extract `object : T { ... }` expression
    fn extract_object_literal(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let prefix = ctx.name_prefix();
        let ordinal = ctx.next_ordinal(&prefix);
        let binary_name = ctx.prefixed(&ordinal.to_string());

        let decl = TypeDeclaration::new(TypeKind::Class, binary_name, node.to_span())
            .with_locality(Locality::Anonymous);
        self.extract_type_body(ctx, node, decl);
    }

    /// Enum entry; an entry with a body compiles to its own class named after the entry
    fn extract_enum_entry(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let has_body = self.find_child(node, "class_body").is_some();
        let name = self
            .find_child(node, "simple_identifier")
            .map(|n| strip_backticks(ctx.node_text(&n)).to_string())
            .unwrap_or_default();

        if !has_body || name.is_empty() {
            self.extract_children(ctx, node);
            return;
        }

        let decl = TypeDeclaration::new(TypeKind::Class, name.clone(), node.to_span())
            .with_declared_name(name)
            .with_locality(Locality::Member);
        self.extract_type_body(ctx, node, decl);
    }

    /// Enter a type declaration and extract its members with a fresh naming prefix
    fn extract_type_body(&self, ctx: &mut ExtractionContext, node: &TSNode, decl: TypeDeclaration) {
        ctx.push_type(decl);
        let saved = ctx.take_name_prefix();
        self.extract_children(ctx, node);
        ctx.restore_name_prefix(saved);
        ctx.pop_type();
    }

    /// Extract function declaration
    fn extract_function(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        // tree-sitter-kotlin uses "simple_identifier" directly, not "name" field
        let name = self
            .find_child(node, "simple_identifier")
            .map(|n| strip_backticks(ctx.node_text(&n)).to_string())
            .unwrap_or_default();

        if name.is_empty() {
            self.extract_children(ctx, node);
            return;
        }

        ctx.push_executable(
            ExecutableUnit::new(ExecutableKind::Method, node.to_span()).with_name(name.clone()),
        );
        ctx.push_name_segment(name);
        self.extract_children(ctx, node);
        ctx.pop_name_segment();
        ctx.pop_executable();
    }

    /// Extract `constructor(...)` inside a class body
    fn extract_secondary_constructor(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut unit = ExecutableUnit::new(ExecutableKind::Constructor, node.to_span());
        if let Some(name) = ctx.enclosing_type_name() {
            unit = unit.with_name(name.to_string());
        }
        ctx.push_executable(unit);
        self.extract_children(ctx, node);
        ctx.pop_executable();
    }

    /// Extract `init { ... }`
    fn extract_initializer(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        ctx.push_executable(
            ExecutableUnit::new(ExecutableKind::Initializer, node.to_span()).with_name("<init>"),
        );
        self.extract_children(ctx, node);
        ctx.pop_executable();
    }

    /// Extract property; member initializers become executables, local ones only name code
    fn extract_property(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let name = self
            .find_child(node, "variable_declaration")
            .and_then(|decl| self.find_child(&decl, "simple_identifier"))
            .map(|n| strip_backticks(ctx.node_text(&n)).to_string())
            .unwrap_or_default();

        let has_initializer = {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .any(|c| matches!(c.kind(), "=" | "property_delegate"));
            found
        };

        if name.is_empty() || !has_initializer {
            self.extract_children(ctx, node);
            return;
        }

        let is_member = matches!(
            ctx.current_parent().and_then(|id| ctx.model.get(id)),
            Some(SourceNode::Type(_))
        );

        if is_member {
            ctx.push_executable(
                ExecutableUnit::new(ExecutableKind::FieldInitializer, node.to_span())
                    .with_name(name.clone()),
            );
        }
        ctx.push_name_segment(name);
        self.extract_children(ctx, node);
        ctx.pop_name_segment();
        if is_member {
            ctx.pop_executable();
        }
    }

    /// Extract lambda literal / anonymous function
    fn extract_lambda(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let prefix = ctx.name_prefix();
        let ordinal = ctx.next_ordinal(&prefix);

        ctx.push_executable(ExecutableUnit::new(ExecutableKind::Lambda, node.to_span()));
        ctx.push_name_segment(ordinal.to_string());
        self.extract_children(ctx, node);
        ctx.pop_name_segment();
        ctx.pop_executable();
    }

    fn extract_children(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.extract_node(ctx, &child);
        }
    }

    fn extract_node(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        match node.kind() {
            "class_declaration" => self.extract_class(ctx, node),
            "object_declaration" | "companion_object" => self.extract_object(ctx, node),
            "object_literal" => self.extract_object_literal(ctx, node),
            "enum_entry" => self.extract_enum_entry(ctx, node),
            "function_declaration" => self.extract_function(ctx, node),
            "secondary_constructor" => self.extract_secondary_constructor(ctx, node),
            "anonymous_initializer" => self.extract_initializer(ctx, node),
            "property_declaration" => self.extract_property(ctx, node),
            "lambda_literal" | "anonymous_function" => self.extract_lambda(ctx, node),
            "line_comment" | "multiline_comment" => {}
            _ => self.extract_children(ctx, node),
        }
    }

    // Helper methods

    fn find_child<'t>(&self, node: &TSNode<'t>, kind: &str) -> Option<TSNode<'t>> {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).find(|c| c.kind() == kind);
        found
    }

    fn get_type_name(&self, node: &TSNode, ctx: &ExtractionContext) -> String {
        self.find_child(node, "type_identifier")
            .or_else(|| self.find_child(node, "simple_identifier"))
            .map(|n| strip_backticks(ctx.node_text(&n)).to_string())
            .unwrap_or_default()
    }

    fn determine_class_kind(&self, node: &TSNode, ctx: &ExtractionContext) -> TypeKind {
        if self.find_child(node, "interface").is_some() {
            return TypeKind::Interface;
        }
        // `enum` is a bare keyword token of the declaration, not a modifier
        if self.find_child(node, "enum").is_some() {
            return TypeKind::Enum;
        }
        let modifiers = self
            .find_child(node, "modifiers")
            .map(|m| ctx.node_text(&m))
            .unwrap_or("");
        let has_modifier = |word: &str| modifiers.split_whitespace().any(|w| w == word);
        if has_modifier("annotation") {
            TypeKind::Annotation
        } else {
            TypeKind::Class
        }
    }

    fn package_name(&self, ctx: &ExtractionContext, node: &TSNode) -> Option<String> {
        if let Some(identifier) = self.find_child(node, "identifier") {
            return Some(ctx.node_text(&identifier).trim().to_string());
        }
        // Fallback: parse package header text
        let text = ctx.node_text(node);
        let pkg = text
            .lines()
            .next()
            .unwrap_or("")
            .trim_start_matches("package")
            .trim()
            .trim_end_matches(';')
            .to_string();
        if pkg.is_empty() {
            None
        } else {
            Some(pkg)
        }
    }
}

/// `name` for both `name` and `` `name` ``
fn strip_backticks(text: &str) -> &str {
    text.trim_matches('`')
}

impl Default for KotlinPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePlugin for KotlinPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_kotlin::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Kotlin
    }

    fn extract(&self, mut ctx: ExtractionContext, tree: &Tree) -> Result<ExtractionResult> {
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "package_header" {
                if let Some(package) = self.package_name(&ctx, &child) {
                    ctx.model.set_package(package);
                }
                continue;
            }
            self.extract_node(&mut ctx, &child);
        }

        let mut result = ctx.into_result();
        let top_level_functions = result
            .model
            .roots()
            .iter()
            .filter(|id| !matches!(result.model.get(**id), Some(SourceNode::Type(_))))
            .count();
        if top_level_functions > 0 {
            result.add_warning(format!(
                "{} top-level declaration(s) outside any class",
                top_level_functions
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::parsing::domain::SourceModel;
    use tree_sitter::Parser;

    fn parse_kotlin(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_kotlin::language())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    fn extract(source: &str) -> ExtractionResult {
        let tree = parse_kotlin(source);
        let ctx = ExtractionContext::new(source, "Test.kt", LanguageId::Kotlin);
        KotlinPlugin::new().extract(ctx, &tree).unwrap()
    }

    fn type_names(model: &SourceModel) -> Vec<String> {
        model.types().map(|t| t.binary_name.clone()).collect()
    }

    #[test]
    fn test_extract_package_and_companions() {
        let result = extract(
            r#"
package com.example

class Outer {
    interface Nested {
        companion object {
            fun a() {}
        }
    }

    companion object {
        fun b() {}
    }
}
"#,
        );
        let model = result.model;
        assert_eq!(model.package.as_deref(), Some("com.example"));
        assert_eq!(
            type_names(&model),
            vec!["Outer", "Nested", "Companion", "Companion"]
        );
        let nested = model.types().find(|t| t.binary_name == "Nested").unwrap();
        assert_eq!(nested.kind, TypeKind::Interface);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_named_companion_and_object() {
        let model = extract(
            r#"
class Outer {
    companion object Factory {
        fun create() {}
    }
}

object Registry {
    fun lookup() {}
}
"#,
        )
        .model;
        assert_eq!(type_names(&model), vec!["Outer", "Factory", "Registry"]);
        assert!(model.types().skip(1).all(|t| t.kind == TypeKind::Object));
    }

    #[test]
    fn test_function_scoped_local_and_anonymous_names() {
        let model = extract(
            r#"
class Outer {
    fun work() {
        val first = object {
            fun a() {}
        }

        class Local {
            fun b() {}
        }

        object : Runnable {
            override fun run() {}
        }
    }
}
"#,
        )
        .model;
        assert_eq!(
            type_names(&model),
            vec!["Outer", "work$first$1", "work$Local", "work$1"]
        );
        let local = model.types().find(|t| t.binary_name == "work$Local").unwrap();
        assert_eq!(local.locality, Locality::Local);
        assert_eq!(local.declared_name.as_deref(), Some("Local"));
    }

    #[test]
    fn test_backtick_function_name() {
        let model = extract(
            r#"
class Outer {
    fun `with spaces`() {
        object : Runnable {
            override fun run() {}
        }
    }
}
"#,
        )
        .model;
        assert_eq!(type_names(&model), vec!["Outer", "with spaces$1"]);
    }

    #[test]
    fn test_member_property_initializer() {
        let model = extract(
            r#"
class Outer {
    val handler = object : Runnable {
        override fun run() {}
    }
}
"#,
        )
        .model;
        assert_eq!(type_names(&model), vec!["Outer", "handler$1"]);
        let init = model
            .executables()
            .find(|e| e.kind == ExecutableKind::FieldInitializer)
            .unwrap();
        assert_eq!(init.name.as_deref(), Some("handler"));
    }

    #[test]
    fn test_lambda_literal_is_executable() {
        let model = extract(
            r#"
class Outer {
    fun work() {
        listOf(1, 2).forEach { println(it) }
    }
}
"#,
        )
        .model;
        let lambda = model
            .executables()
            .find(|e| e.kind == ExecutableKind::Lambda)
            .unwrap();
        assert_eq!(model.enclosing_type(lambda.id).unwrap().binary_name, "Outer");
    }

    #[test]
    fn test_lambda_numbers_share_object_counter() {
        let model = extract(
            r#"
class A {
    fun w() {
        listOf(1).forEach {
            object : Runnable {
                override fun run() {}
            }
        }
        object : Runnable {
            override fun run() {}
        }
    }
}
"#,
        )
        .model;
        assert_eq!(type_names(&model), vec!["A", "w$1$1", "w$2"]);
    }

    #[test]
    fn test_enum_entry_init_and_secondary_constructor() {
        let model = extract(
            r#"
enum class E {
    A {
        override fun f() = 1
    },
    B;

    open fun f() = 0
}

class K(val x: Int) {
    init {
        println("init")
    }

    constructor() : this(0) {
        println("secondary")
    }
}
"#,
        )
        .model;
        assert_eq!(type_names(&model), vec!["E", "A", "K"]);
        assert_eq!(model.types().next().unwrap().kind, TypeKind::Enum);

        let kinds: Vec<_> = model
            .executables()
            .map(|e| (e.kind, e.name.as_deref()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ExecutableKind::Method, Some("f")),
                (ExecutableKind::Method, Some("f")),
                (ExecutableKind::Initializer, Some("<init>")),
                (ExecutableKind::Constructor, Some("K")),
            ]
        );
    }

    #[test]
    fn test_top_level_function_warns() {
        let result = extract(
            r#"
fun main() {
    println("hi")
}
"#,
        );
        assert_eq!(result.model.types().count(), 0);
        assert_eq!(result.warnings.len(), 1);
    }
}
