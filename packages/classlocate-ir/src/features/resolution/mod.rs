//! Resolution Feature
//!
//! Maps a source element to the binary class its bytecode compiles into.
//!
//! ## Structure
//! - `binary_name` - BinaryName derived from a declaration chain
//! - `result` - ResolutionResult (base class + containing binary class)
//! - `resolver` - BinaryNameResolver walking enclosing declarations

pub mod binary_name;
pub mod resolver;
pub mod result;

pub use binary_name::BinaryName;
pub use resolver::{resolve, BinaryNameResolver};
pub use result::ResolutionResult;
