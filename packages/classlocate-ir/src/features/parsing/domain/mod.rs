//! Parsing domain: the per-file source model

pub mod language;
pub mod source_model;

pub use language::LanguageId;
pub use source_model::{
    Ancestors, ExecutableKind, ExecutableUnit, Locality, NodeId, SourceModel, SourceNode,
    SyntheticNames, TypeDeclaration, TypeKind,
};
