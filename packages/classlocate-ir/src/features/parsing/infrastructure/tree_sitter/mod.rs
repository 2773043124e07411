//! Tree-sitter adapter

pub mod parser;

pub use parser::{SyntaxError, TreeSitterParser};
