//! Parsing ports

pub mod language_plugin;

pub use crate::features::parsing::domain::LanguageId;
pub use language_plugin::{
    ExtractionContext, ExtractionResult, LanguagePlugin, LanguageRegistry, SpanExt,
};
