//! Java Language Plugin
//!
//! Implements LanguagePlugin for Java source code.
//! Supports: classes, interfaces, enums, records, annotations, anonymous and local classes,
//! methods, constructors, initializers, field initializers, lambdas, module descriptors
//!
//! Synthetic names follow javac: the n-th anonymous class of an enclosing type is `n`,
//! the n-th local class named `Foo` is `nFoo`.

use tree_sitter::{Language as TSLanguage, Node as TSNode, Tree};

use crate::errors::Result;
use crate::features::parsing::domain::{
    ExecutableKind, ExecutableUnit, Locality, TypeDeclaration, TypeKind,
};
use crate::features::parsing::ports::{
    ExtractionContext, ExtractionResult, LanguageId, LanguagePlugin, SpanExt,
};

/// Binary name of a module descriptor; it lives outside any package
const MODULE_INFO: &str = "module-info";

/// Java language plugin
pub struct JavaPlugin;

impl JavaPlugin {
    pub fn new() -> Self {
        Self
    }

    /// Package name from `package a.b.c;`
    fn package_name(&self, ctx: &ExtractionContext, node: &TSNode) -> Option<String> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
        Some(ctx.node_text(&name).to_string())
    }

    /// Extract class / interface / enum / record / annotation declaration
    fn extract_type(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let name = node
            .child_by_field_name("name")
            .map(|n| ctx.node_text(&n).to_string())
            .unwrap_or_default();

        if name.is_empty() {
            return;
        }

        let kind = match node.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            "annotation_type_declaration" => TypeKind::Annotation,
            _ => TypeKind::Class,
        };

        let locality = ctx.locality_here();
        let binary_name = match locality {
            Locality::Local => format!("{}{}", ctx.next_ordinal(&name), name),
            _ => name.clone(),
        };

        ctx.push_type(
            TypeDeclaration::new(kind, binary_name, node.to_span())
                .with_declared_name(name)
                .with_locality(locality),
        );
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_children(ctx, &body);
        }
        ctx.pop_type();
    }

    /// Extract an anonymous class body
    fn extract_anonymous_class(&self, ctx: &mut ExtractionContext, body: &TSNode) {
        let ordinal = ctx.next_ordinal("");
        ctx.push_type(
            TypeDeclaration::new(TypeKind::Class, ordinal.to_string(), body.to_span())
                .with_locality(Locality::Anonymous),
        );
        self.extract_children(ctx, body);
        ctx.pop_type();
    }

    /// Extract `new T(args) { ... }`
    ///
    /// Arguments are evaluated by the enclosing code, so they are visited before the body.
    fn extract_object_creation(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut body = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "class_body" {
                body = Some(child);
            } else {
                self.extract_node(ctx, &child);
            }
        }

        if let Some(body) = body {
            self.extract_anonymous_class(ctx, &body);
        }
    }

    /// Extract enum constant (a constant with a body is an anonymous subclass)
    fn extract_enum_constant(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        if let Some(args) = node.child_by_field_name("arguments") {
            self.extract_node(ctx, &args);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_anonymous_class(ctx, &body);
        }
    }

    /// Extract method / constructor
    fn extract_method(&self, ctx: &mut ExtractionContext, node: &TSNode, kind: ExecutableKind) {
        let name = node
            .child_by_field_name("name")
            .map(|n| ctx.node_text(&n).to_string())
            .unwrap_or_default();

        let mut unit = ExecutableUnit::new(kind, node.to_span());
        if !name.is_empty() {
            unit = unit.with_name(name);
        }

        ctx.push_executable(unit);
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_node(ctx, &body);
        }
        ctx.pop_executable();
    }

    /// Extract static or instance initializer block
    fn extract_initializer(&self, ctx: &mut ExtractionContext, node: &TSNode, name: &str) {
        ctx.push_executable(ExecutableUnit::new(ExecutableKind::Initializer, node.to_span()).with_name(name));
        self.extract_children(ctx, node);
        ctx.pop_executable();
    }

    /// Extract field / constant initializers
    fn extract_field(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut cursor = node.walk();
        let declarators: Vec<TSNode> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        for declarator in declarators {
            let Some(value) = declarator.child_by_field_name("value") else {
                continue;
            };
            let name = declarator
                .child_by_field_name("name")
                .map(|n| ctx.node_text(&n).to_string())
                .unwrap_or_default();

            ctx.push_executable(
                ExecutableUnit::new(ExecutableKind::FieldInitializer, declarator.to_span())
                    .with_name(name),
            );
            self.extract_node(ctx, &value);
            ctx.pop_executable();
        }
    }

    /// Extract lambda expression
    fn extract_lambda(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        ctx.push_executable(ExecutableUnit::new(ExecutableKind::Lambda, node.to_span()));
        if let Some(body) = node.child_by_field_name("body") {
            self.extract_node(ctx, &body);
        }
        ctx.pop_executable();
    }

    /// Extract every child of a node
    fn extract_children(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.extract_node(ctx, &child);
        }
    }

    /// Extract a single node
    fn extract_node(&self, ctx: &mut ExtractionContext, node: &TSNode) {
        match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => self.extract_type(ctx, node),
            "method_declaration" => self.extract_method(ctx, node, ExecutableKind::Method),
            "constructor_declaration" | "compact_constructor_declaration" => {
                self.extract_method(ctx, node, ExecutableKind::Constructor)
            }
            "static_initializer" => self.extract_initializer(ctx, node, "<clinit>"),
            "block" if is_type_body(node.parent()) => {
                self.extract_initializer(ctx, node, "<init>")
            }
            "field_declaration" | "constant_declaration" => self.extract_field(ctx, node),
            "object_creation_expression" => self.extract_object_creation(ctx, node),
            "enum_constant" => self.extract_enum_constant(ctx, node),
            "lambda_expression" => self.extract_lambda(ctx, node),
            "line_comment" | "block_comment" => {}
            _ => self.extract_children(ctx, node),
        }
    }
}

/// Whether a node is a type body holding member declarations
fn is_type_body(node: Option<TSNode>) -> bool {
    matches!(
        node.map(|n| n.kind()),
        Some("class_body" | "enum_body_declarations")
    )
}

impl Default for JavaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguagePlugin for JavaPlugin {
    fn tree_sitter_language(&self) -> TSLanguage {
        tree_sitter_java::language()
    }

    fn language_id(&self) -> LanguageId {
        LanguageId::Java
    }

    fn extract(&self, mut ctx: ExtractionContext, tree: &Tree) -> Result<ExtractionResult> {
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if child.kind() == "package_declaration" {
                if let Some(package) = self.package_name(&ctx, &child) {
                    ctx.model.set_package(package);
                }
                continue;
            }
            if child.kind() == "module_declaration" {
                ctx.push_type(
                    TypeDeclaration::new(TypeKind::Module, MODULE_INFO, child.to_span())
                        .with_declared_name(MODULE_INFO),
                );
                ctx.pop_type();
                continue;
            }
            self.extract_node(&mut ctx, &child);
        }

        let mut result = ctx.into_result();
        if result.model.top_level_types().next().is_none() {
            result.add_warning("no type declarations found");
        }
        Ok(result)
    }
}
