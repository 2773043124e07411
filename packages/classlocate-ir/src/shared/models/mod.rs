//! Shared domain models

pub mod span;

pub use span::Span;
