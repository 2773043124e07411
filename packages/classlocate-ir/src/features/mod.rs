//! Feature modules (vertical slices)
//!
//! parsing → resolution → verification

pub mod parsing;
pub mod resolution;
pub mod verification;
