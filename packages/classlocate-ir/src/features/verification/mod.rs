//! Verification Feature
//!
//! Checks resolver output against test vectors embedded in fixture sources.
//!
//! ## Structure
//! - `fixture` - FileTestVector / PsiElementTestVector comment parsing
//! - `validator` - Verdicts with field-level diffs
//! - `runner` - Discovery, parallel per-file checks, aggregation
//! - `report` - JSON, Markdown and terminal rendering

pub mod fixture;
pub mod report;
pub mod runner;
pub mod validator;

pub use fixture::{
    parse_fixture, ElementReference, ElementTestVector, FileTestVector, Fixture, ReferenceKind,
};
pub use report::{JsonReporter, MarkdownReporter, TerminalReporter};
pub use runner::{
    FileError, FileOutcome, FileReport, FileVectorOutcome, FixtureRunner, RunReport,
    VectorOutcome,
};
pub use validator::{verify, verify_file, ExpectedResolution, FieldMismatch, Verdict, VectorField};
