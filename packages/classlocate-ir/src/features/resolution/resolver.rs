//! Binary naming resolver
//!
//! Walks outward from an element to its nearest enclosing type declaration.
//! Executable units (methods, initializers, lambdas) are transparent: a lambda
//! never owns a binary class, while anonymous and local classes always do.

use tracing::debug;

use super::{BinaryName, ResolutionResult};
use crate::errors::{LocateError, Result};
use crate::features::parsing::domain::{NodeId, SourceModel, SourceNode};

/// Resolver over one immutable source model
pub struct BinaryNameResolver<'m> {
    model: &'m SourceModel,
}

impl<'m> BinaryNameResolver<'m> {
    pub fn new(model: &'m SourceModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'m SourceModel {
        self.model
    }

    /// Resolve the base and containing binary class names of `element`
    pub fn resolve(&self, element: NodeId) -> Result<ResolutionResult> {
        let node = self.model.get(element).ok_or_else(|| {
            LocateError::unresolved(
                &self.model.file_path,
                element.to_string(),
                "element is not part of this source model",
            )
        })?;

        let containing = self.binary_name_of(element).ok_or_else(|| {
            LocateError::unresolved(
                &self.model.file_path,
                format!("{} {}", node.describe(), element),
                format!("no enclosing type declaration (line {})", node.span().start_line),
            )
        })?;
        let base = containing.outermost();

        let result = ResolutionResult::new(&base, &containing);
        debug!(
            file = %self.model.file_path,
            element = %node.describe(),
            containing = %result.containing_binary_class_name,
            "Resolved element"
        );
        Ok(result)
    }

    /// Resolve the innermost element containing a byte offset
    pub fn resolve_at(&self, offset: usize) -> Result<ResolutionResult> {
        let element = self.model.element_at(offset).ok_or_else(|| {
            LocateError::unresolved(
                &self.model.file_path,
                format!("offset {}", offset),
                "no declaration encloses this position",
            )
        })?;
        self.resolve(element)
    }

    /// Resolve the innermost element at a 1-based line and 0-based column
    pub fn resolve_at_position(&self, line: u32, col: u32) -> Result<ResolutionResult> {
        let element = self.model.element_at_position(line, col).ok_or_else(|| {
            LocateError::unresolved(
                &self.model.file_path,
                format!("position {}:{}", line, col),
                "no declaration encloses this position",
            )
        })?;
        self.resolve(element)
    }

    /// Resolve every node of the model, in arena order
    pub fn resolve_all(&self) -> Vec<(NodeId, Result<ResolutionResult>)> {
        self.model
            .iter()
            .map(SourceNode::id)
            .map(|id| (id, self.resolve(id)))
            .collect()
    }

    /// Binary name of the nearest type at or above `element`
    pub fn binary_name_of(&self, element: NodeId) -> Option<BinaryName> {
        let chain = self.model.type_chain(element);
        BinaryName::from_chain(self.model.package.as_deref(), &chain)
    }

    /// Every binary class declared in the file, in source order
    pub fn declared_binary_names(&self) -> Vec<BinaryName> {
        self.model
            .types()
            .filter_map(|t| self.binary_name_of(t.id))
            .collect()
    }

    /// Binary names of the file's outermost declarations
    pub fn top_level_binary_names(&self) -> Vec<BinaryName> {
        self.model
            .top_level_types()
            .filter_map(|t| self.binary_name_of(t.id))
            .collect()
    }
}

/// Resolve one element of a model
pub fn resolve(model: &SourceModel, element: NodeId) -> Result<ResolutionResult> {
    BinaryNameResolver::new(model).resolve(element)
}
