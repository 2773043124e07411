//! Source model
//!
//! Arena of declared types and executable units extracted from one file.
//! Parent links are arena indices; children are kept in source order.
//! A model is built once by a language plugin and is read-only afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::LanguageId;
use crate::shared::models::Span;

/// Index of a node in its model's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    /// Kotlin `object` / `companion object`
    Object,
    /// Java module descriptor (`module-info`)
    Module,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
            TypeKind::Object => "object",
            TypeKind::Module => "module",
        }
    }
}

/// Where a type is declared relative to its enclosing construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locality {
    TopLevel,
    /// Nested or inner type declared in a type body
    Member,
    /// Named type declared inside executable code
    Local,
    Anonymous,
}

/// Class, interface, enum, record, annotation or object declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub id: NodeId,
    /// Absent for anonymous classes
    pub declared_name: Option<String>,
    /// Segment this type contributes to its binary class name
    pub binary_name: String,
    pub kind: TypeKind,
    pub locality: Locality,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub span: Span,
}

impl TypeDeclaration {
    pub fn new(kind: TypeKind, binary_name: impl Into<String>, span: Span) -> Self {
        Self {
            id: NodeId(0),
            declared_name: None,
            binary_name: binary_name.into(),
            kind,
            locality: Locality::TopLevel,
            parent: None,
            children: Vec::new(),
            span,
        }
    }

    pub fn with_declared_name(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    pub fn with_locality(mut self, locality: Locality) -> Self {
        self.locality = locality;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.locality == Locality::Anonymous
    }
}

/// Kind of executable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutableKind {
    Method,
    Constructor,
    Initializer,
    FieldInitializer,
    Lambda,
}

impl ExecutableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutableKind::Method => "method",
            ExecutableKind::Constructor => "constructor",
            ExecutableKind::Initializer => "initializer",
            ExecutableKind::FieldInitializer => "field initializer",
            ExecutableKind::Lambda => "lambda",
        }
    }
}

/// Method, constructor, initializer, field initializer or lambda body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableUnit {
    pub id: NodeId,
    pub kind: ExecutableKind,
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub span: Span,
}

impl ExecutableUnit {
    pub fn new(kind: ExecutableKind, span: Span) -> Self {
        Self {
            id: NodeId(0),
            kind,
            name: None,
            parent: None,
            children: Vec::new(),
            span,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Arena entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum SourceNode {
    Type(TypeDeclaration),
    Executable(ExecutableUnit),
}

impl SourceNode {
    pub fn id(&self) -> NodeId {
        match self {
            SourceNode::Type(t) => t.id,
            SourceNode::Executable(e) => e.id,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            SourceNode::Type(t) => t.parent,
            SourceNode::Executable(e) => e.parent,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            SourceNode::Type(t) => &t.children,
            SourceNode::Executable(e) => &e.children,
        }
    }

    fn children_mut(&mut self) -> &mut Vec<NodeId> {
        match self {
            SourceNode::Type(t) => &mut t.children,
            SourceNode::Executable(e) => &mut e.children,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SourceNode::Type(t) => t.span,
            SourceNode::Executable(e) => e.span,
        }
    }

    pub fn as_type(&self) -> Option<&TypeDeclaration> {
        match self {
            SourceNode::Type(t) => Some(t),
            SourceNode::Executable(_) => None,
        }
    }

    pub fn as_executable(&self) -> Option<&ExecutableUnit> {
        match self {
            SourceNode::Executable(e) => Some(e),
            SourceNode::Type(_) => None,
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, SourceNode::Type(_))
    }

    /// Human-readable label, e.g. `method 'run'` or `anonymous class '1'`
    pub fn describe(&self) -> String {
        match self {
            SourceNode::Type(t) => match (&t.declared_name, t.locality) {
                (_, Locality::Anonymous) => format!("anonymous class '{}'", t.binary_name),
                (Some(name), Locality::Local) => format!("local {} '{}'", t.kind.as_str(), name),
                (Some(name), _) => format!("{} '{}'", t.kind.as_str(), name),
                (None, _) => format!("{} '{}'", t.kind.as_str(), t.binary_name),
            },
            SourceNode::Executable(e) => match &e.name {
                Some(name) => format!("{} '{}'", e.kind.as_str(), name),
                None => e.kind.as_str().to_string(),
            },
        }
    }
}

/// Per-owner ordinal counters for compiler-generated class names
#[derive(Debug, Default, Clone)]
pub struct SyntheticNames {
    counters: HashMap<(Option<NodeId>, String), u32>,
}

impl SyntheticNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next 1-based ordinal for `key` within `owner`
    pub fn next_ordinal(&mut self, owner: Option<NodeId>, key: &str) -> u32 {
        let counter = self.counters.entry((owner, key.to_string())).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Per-file arena of source nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModel {
    pub file_path: String,
    pub language: LanguageId,
    /// Package / namespace, `None` for the default package
    pub package: Option<String>,
    nodes: Vec<SourceNode>,
    roots: Vec<NodeId>,
}

impl SourceModel {
    pub fn new(file_path: impl Into<String>, language: LanguageId) -> Self {
        Self {
            file_path: file_path.into(),
            language,
            package: None,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.set_package(package);
        self
    }

    pub fn set_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        self.package = if package.is_empty() {
            None
        } else {
            Some(package)
        };
    }

    /// Add a type declaration under `parent` (or as a root)
    pub fn add_type(&mut self, parent: Option<NodeId>, decl: TypeDeclaration) -> NodeId {
        self.insert(parent, SourceNode::Type(decl))
    }

    /// Add an executable unit under `parent` (or as a root)
    pub fn add_executable(&mut self, parent: Option<NodeId>, unit: ExecutableUnit) -> NodeId {
        self.insert(parent, SourceNode::Executable(unit))
    }

    fn insert(&mut self, parent: Option<NodeId>, mut node: SourceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());

        match &mut node {
            SourceNode::Type(t) => {
                t.id = id;
                t.parent = parent;
            }
            SourceNode::Executable(e) => {
                e.id = id;
                e.parent = parent;
            }
        }

        match parent {
            Some(p) => self.nodes[p.0].children_mut().push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SourceNode> {
        self.nodes.get(id.0)
    }

    pub fn get_type(&self, id: NodeId) -> Option<&TypeDeclaration> {
        self.get(id).and_then(SourceNode::as_type)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes in creation (pre-)order
    pub fn iter(&self) -> impl Iterator<Item = &SourceNode> {
        self.nodes.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.nodes.iter().filter_map(SourceNode::as_type)
    }

    pub fn executables(&self) -> impl Iterator<Item = &ExecutableUnit> {
        self.nodes.iter().filter_map(SourceNode::as_executable)
    }

    pub fn top_level_types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.roots.iter().filter_map(|id| self.get_type(*id))
    }

    /// Walk from `id` (inclusive) to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            model: self,
            next: self.get(id).map(|_| id),
        }
    }

    /// Nearest type declaration at or above `id`
    pub fn enclosing_type(&self, id: NodeId) -> Option<&TypeDeclaration> {
        self.ancestors(id).find_map(SourceNode::as_type)
    }

    /// Outermost type declaration at or above `id`
    pub fn top_level_type(&self, id: NodeId) -> Option<&TypeDeclaration> {
        self.ancestors(id).filter_map(SourceNode::as_type).last()
    }

    /// Type declarations from the outermost down to the nearest one enclosing `id`
    pub fn type_chain(&self, id: NodeId) -> Vec<&TypeDeclaration> {
        let mut chain: Vec<&TypeDeclaration> =
            self.ancestors(id).filter_map(SourceNode::as_type).collect();
        chain.reverse();
        chain
    }

    /// Nodes below `id` in pre-order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(id) {
            Some(node) => node.children().iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.get(current) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        out
    }

    /// Innermost node whose span contains the byte offset
    pub fn element_at(&self, offset: usize) -> Option<NodeId> {
        self.innermost(|span| span.contains_offset(offset))
    }

    /// Innermost node whose span contains the (1-based line, 0-based column) position
    pub fn element_at_position(&self, line: u32, col: u32) -> Option<NodeId> {
        self.innermost(|span| span.contains_position(line, col))
    }

    fn innermost(&self, contains: impl Fn(&Span) -> bool) -> Option<NodeId> {
        // Nested spans are strictly smaller; later ids are deeper on ties.
        self.nodes
            .iter()
            .filter(|n| contains(&n.span()))
            .min_by(|a, b| {
                a.span()
                    .byte_len()
                    .cmp(&b.span().byte_len())
                    .then_with(|| b.id().cmp(&a.id()))
            })
            .map(SourceNode::id)
    }

    /// Locate a type by its chain of declared simple names (`["Outer", "Inner"]`)
    pub fn find_type(&self, path: &[&str]) -> Option<&TypeDeclaration> {
        let (first, rest) = path.split_first()?;
        let mut current = self
            .top_level_types()
            .find(|t| t.declared_name.as_deref() == Some(*first))?;

        for segment in rest {
            current = current
                .children
                .iter()
                .filter_map(|id| self.get_type(*id))
                .find(|t| {
                    t.locality == Locality::Member && t.declared_name.as_deref() == Some(*segment)
                })?;
        }
        Some(current)
    }

    /// Locate an executable by owner type path, kind and member name
    ///
    /// Lambdas are looked up as the first lambda inside the named method.
    pub fn find_by_reference(
        &self,
        owner_path: &[&str],
        kind: ExecutableKind,
        member: &str,
    ) -> Option<NodeId> {
        let owner = self.find_type(owner_path)?;
        let members = owner
            .children
            .iter()
            .filter_map(|id| self.get(*id).and_then(SourceNode::as_executable));

        match kind {
            ExecutableKind::Lambda => {
                let method = members
                    .filter(|e| e.kind == ExecutableKind::Method)
                    .find(|e| e.name.as_deref() == Some(member))?;
                self.descendants(method.id).into_iter().find(|id| {
                    matches!(
                        self.get(*id),
                        Some(SourceNode::Executable(e)) if e.kind == ExecutableKind::Lambda
                    )
                })
            }
            ExecutableKind::Constructor | ExecutableKind::Initializer => members
                .filter(|e| e.kind == kind)
                .find(|e| {
                    member.is_empty()
                        || member == "<init>"
                        || member == "<clinit>"
                        || e.name.as_deref() == Some(member)
                })
                .map(|e| e.id),
            ExecutableKind::Method | ExecutableKind::FieldInitializer => members
                .filter(|e| e.kind == kind)
                .find(|e| e.name.as_deref() == Some(member))
                .map(|e| e.id),
        }
    }
}

/// Iterator from a node up to its root
pub struct Ancestors<'a> {
    model: &'a SourceModel,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a SourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.model.get(self.next?)?;
        self.next = node.parent();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span::new(1, 0, 1, 0).with_bytes(start, end)
    }

    /// Outer { method { new Object() { run { lambda } } } ; Inner { method } }
    fn sample_model() -> SourceModel {
        let mut model = SourceModel::new("Outer.java", LanguageId::Java).with_package("foo");
        let outer = model.add_type(
            None,
            TypeDeclaration::new(TypeKind::Class, "Outer", span(0, 200)).with_declared_name("Outer"),
        );
        let method = model.add_executable(
            Some(outer),
            ExecutableUnit::new(ExecutableKind::Method, span(10, 100)).with_name("method"),
        );
        let anon = model.add_type(
            Some(method),
            TypeDeclaration::new(TypeKind::Class, "1", span(20, 90))
                .with_locality(Locality::Anonymous),
        );
        let run = model.add_executable(
            Some(anon),
            ExecutableUnit::new(ExecutableKind::Method, span(30, 80)).with_name("run"),
        );
        model.add_executable(Some(run), ExecutableUnit::new(ExecutableKind::Lambda, span(40, 60)));
        let inner = model.add_type(
            Some(outer),
            TypeDeclaration::new(TypeKind::Class, "Inner", span(110, 190))
                .with_declared_name("Inner")
                .with_locality(Locality::Member),
        );
        model.add_executable(
            Some(inner),
            ExecutableUnit::new(ExecutableKind::Method, span(120, 180)).with_name("method"),
        );
        model
    }

    #[test]
    fn test_arena_links_parents_and_children() {
        let model = sample_model();
        assert_eq!(model.len(), 7);
        assert_eq!(model.roots(), &[NodeId(0)]);
        assert_eq!(model.get(NodeId(0)).unwrap().children(), &[NodeId(1), NodeId(5)]);
        assert_eq!(model.get(NodeId(2)).unwrap().parent(), Some(NodeId(1)));
        assert_eq!(model.package.as_deref(), Some("foo"));
    }

    #[test]
    fn test_ancestors_include_self() {
        let model = sample_model();
        let ids: Vec<NodeId> = model.ancestors(NodeId(4)).map(SourceNode::id).collect();
        assert_eq!(ids, vec![NodeId(4), NodeId(3), NodeId(2), NodeId(1), NodeId(0)]);
    }

    #[test]
    fn test_enclosing_type_skips_executables() {
        let model = sample_model();
        assert_eq!(model.enclosing_type(NodeId(4)).unwrap().binary_name, "1");
        assert_eq!(model.enclosing_type(NodeId(1)).unwrap().binary_name, "Outer");
        assert_eq!(model.enclosing_type(NodeId(2)).unwrap().binary_name, "1");
        assert_eq!(model.top_level_type(NodeId(4)).unwrap().binary_name, "Outer");
    }

    #[test]
    fn test_type_chain_order() {
        let model = sample_model();
        let chain: Vec<&str> = model
            .type_chain(NodeId(4))
            .iter()
            .map(|t| t.binary_name.as_str())
            .collect();
        assert_eq!(chain, vec!["Outer", "1"]);
    }

    #[test]
    fn test_element_at_picks_innermost() {
        let model = sample_model();
        assert_eq!(model.element_at(45), Some(NodeId(4)));
        assert_eq!(model.element_at(35), Some(NodeId(3)));
        assert_eq!(model.element_at(15), Some(NodeId(1)));
        assert_eq!(model.element_at(105), Some(NodeId(0)));
        assert_eq!(model.element_at(500), None);
    }

    #[test]
    fn test_find_by_reference() {
        let model = sample_model();
        assert_eq!(
            model.find_by_reference(&["Outer"], ExecutableKind::Method, "method"),
            Some(NodeId(1))
        );
        assert_eq!(
            model.find_by_reference(&["Outer", "Inner"], ExecutableKind::Method, "method"),
            Some(NodeId(6))
        );
        assert_eq!(
            model.find_by_reference(&["Outer"], ExecutableKind::Lambda, "method"),
            Some(NodeId(4))
        );
        assert_eq!(
            model.find_by_reference(&["Outer", "Missing"], ExecutableKind::Method, "method"),
            None
        );
    }

    #[test]
    fn test_descendants_preorder() {
        let model = sample_model();
        assert_eq!(
            model.descendants(NodeId(0)),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5), NodeId(6)]
        );
    }

    #[test]
    fn test_synthetic_names_are_per_owner_and_key() {
        let mut names = SyntheticNames::new();
        assert_eq!(names.next_ordinal(Some(NodeId(0)), ""), 1);
        assert_eq!(names.next_ordinal(Some(NodeId(0)), ""), 2);
        assert_eq!(names.next_ordinal(Some(NodeId(0)), "Local"), 1);
        assert_eq!(names.next_ordinal(Some(NodeId(3)), ""), 1);
    }

    #[test]
    fn test_describe() {
        let model = sample_model();
        assert_eq!(model.get(NodeId(2)).unwrap().describe(), "anonymous class '1'");
        assert_eq!(model.get(NodeId(3)).unwrap().describe(), "method 'run'");
        assert_eq!(model.get(NodeId(4)).unwrap().describe(), "lambda");
        assert_eq!(model.get(NodeId(5)).unwrap().describe(), "class 'Inner'");
    }
}
