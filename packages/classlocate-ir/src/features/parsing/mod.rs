//! Parsing Feature
//!
//! Builds the per-file source model: declared types and executable units.
//!
//! ## Structure
//! - `domain/` - SourceModel arena, node kinds, LanguageId
//! - `ports/` - LanguagePlugin trait, ExtractionContext
//! - `application/` - ParseFileUseCase
//! - `infrastructure/` - TreeSitterParser
//! - `plugins/` - Language-specific plugins (Java, Kotlin)

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
pub mod ports;

// Re-exports
pub use application::{parse_file, parse_source, ParseFileUseCase};
pub use domain::{
    ExecutableKind, ExecutableUnit, LanguageId, Locality, NodeId, SourceModel, SourceNode,
    TypeDeclaration, TypeKind,
};

#[doc(hidden)]
pub use infrastructure::TreeSitterParser;
pub use plugins::{create_full_registry, create_registry, JavaPlugin, KotlinPlugin};
pub use ports::{ExtractionContext, ExtractionResult, LanguagePlugin, LanguageRegistry, SpanExt};
