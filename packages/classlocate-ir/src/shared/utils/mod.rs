//! Shared utilities

pub mod scope_stack;

pub use scope_stack::ScopeStack;
