//! Parsing application layer

pub mod parse_file;

pub use parse_file::{parse_file, parse_source, ParseFileUseCase};
