//! Fixture runner
//!
//! Discovers fixture files, builds one source model per file, resolves every
//! annotated element and checks it. Files are independent: each worker
//! returns an immutable [`FileReport`] and a single aggregator merges them.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::fixture::{parse_fixture, ElementTestVector, FileTestVector};
use super::validator::{verify, verify_file, ExpectedResolution, Verdict};
use crate::config::RunConfig;
use crate::errors::{LocateError, Result};
use crate::features::parsing::domain::NodeId;
use crate::features::parsing::{parse_source, SourceModel};
use crate::features::resolution::{BinaryName, BinaryNameResolver, ResolutionResult};

/// Result of one element vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorOutcome {
    pub line: u32,
    pub reference: String,
    pub expected: ExpectedResolution,
    pub actual: ResolutionResult,
    pub verdict: Verdict,
}

/// Result of one file vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVectorOutcome {
    pub line: u32,
    pub verdict: Verdict,
}

/// Everything checked in one fixture file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_path: String,
    pub file_vectors: Vec<FileVectorOutcome>,
    pub vectors: Vec<VectorOutcome>,
}

impl FileReport {
    pub fn total(&self) -> usize {
        self.file_vectors.len() + self.vectors.len()
    }

    pub fn passed(&self) -> usize {
        self.file_vectors.iter().filter(|v| v.verdict.is_pass()).count()
            + self.vectors.iter().filter(|v| v.verdict.is_pass()).count()
    }
}

/// File that could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file_path: String,
    pub message: String,
}

/// Per-file worker output
pub type FileOutcome = std::result::Result<FileReport, FileError>;

/// Aggregated outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub errors: Vec<FileError>,
    pub duration: Duration,
}

impl RunReport {
    /// Merge per-file outcomes, ordered by file path
    pub fn aggregate(outcomes: Vec<FileOutcome>, duration: Duration) -> Self {
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => files.push(report),
                Err(error) => errors.push(error),
            }
        }
        files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        Self {
            files,
            errors,
            duration,
        }
    }

    /// Vectors checked across every file
    pub fn total(&self) -> usize {
        self.files.iter().map(FileReport::total).sum()
    }

    pub fn passed(&self) -> usize {
        self.files.iter().map(FileReport::passed).sum()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Failed element vectors with their file path
    pub fn failures(&self) -> Vec<(&str, &VectorOutcome)> {
        self.files
            .iter()
            .flat_map(|f| {
                f.vectors
                    .iter()
                    .filter(|v| !v.verdict.is_pass())
                    .map(move |v| (f.file_path.as_str(), v))
            })
            .collect()
    }

    /// Failed file vectors with their file path
    pub fn file_failures(&self) -> Vec<(&str, &FileVectorOutcome)> {
        self.files
            .iter()
            .flat_map(|f| {
                f.file_vectors
                    .iter()
                    .filter(|v| !v.verdict.is_pass())
                    .map(move |v| (f.file_path.as_str(), v))
            })
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errors.is_empty()
    }

    /// Multi-line summary with itemized failures
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} file(s), {} vector(s), {} passed, {} failed, {} error(s)\n",
            self.files.len() + self.errors.len(),
            self.total(),
            self.passed(),
            self.failed(),
            self.errors.len()
        );

        if self.is_success() {
            out.push_str("✅ All vectors resolved as expected");
            return out;
        }

        out.push_str(&format!(
            "❌ {} failure(s) detected:\n",
            self.failed() + self.errors.len()
        ));
        for (file, outcome) in self.file_failures() {
            for m in outcome.verdict.mismatches() {
                out.push_str(&format!(
                    "  - {}:{} {}: expected {}, actual {}\n",
                    file, outcome.line, m.field, m.expected, m.actual
                ));
            }
        }
        for (file, outcome) in self.failures() {
            for m in outcome.verdict.mismatches() {
                out.push_str(&format!(
                    "  - {}:{} [{}] {}: expected {}, actual {}\n",
                    file, outcome.line, outcome.reference, m.field, m.expected, m.actual
                ));
            }
        }
        for error in &self.errors {
            out.push_str(&format!("  - {}: {}\n", error.file_path, error.message));
        }
        out.trim_end().to_string()
    }
}

/// Fixture runner
pub struct FixtureRunner {
    config: RunConfig,
}

impl FixtureRunner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fixture files under the configured roots, sorted
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.config.roots {
            if root.is_file() {
                files.push(root.clone());
                continue;
            }
            if !root.exists() {
                return Err(LocateError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("root not found: {}", root.display()),
                )));
            }
            for entry in WalkDir::new(root).follow_links(true) {
                let entry = entry.map_err(|e| LocateError::Io(e.into()))?;
                if entry.file_type().is_file() && self.config.accepts(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Discover and check every fixture file
    pub fn run(&self) -> Result<RunReport> {
        let files = self.discover()?;
        info!(
            files = files.len(),
            config = %self.config.describe(),
            "Running fixture verification"
        );
        let report = self.run_files(&files)?;
        info!(
            total = report.total(),
            passed = report.passed(),
            failed = report.failed(),
            errors = report.errors.len(),
            "Verification finished in {:.2}s",
            report.duration.as_secs_f64()
        );
        Ok(report)
    }

    /// Check the given files
    pub fn run_files(&self, files: &[PathBuf]) -> Result<RunReport> {
        let start = Instant::now();

        #[cfg(feature = "parallel")]
        let outcomes: Vec<FileOutcome> = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("classlocate-run-{}", i))
                    .build()
                    .map_err(|e| LocateError::config(e.to_string()))?;
                pool.install(|| files.par_iter().map(|f| Self::check_file(f)).collect())
            }
            None => {
                crate::init_rayon();
                files.par_iter().map(|f| Self::check_file(f)).collect()
            }
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<FileOutcome> = files.iter().map(|f| Self::check_file(f)).collect();

        Ok(RunReport::aggregate(outcomes, start.elapsed()))
    }

    fn check_file(path: &Path) -> FileOutcome {
        let file_path = path.to_string_lossy().to_string();
        Self::process_file(path).map_err(|e| {
            warn!(file = %file_path, "{}", e);
            FileError {
                file_path,
                message: e.to_string(),
            }
        })
    }

    /// Check one fixture file on disk
    pub fn process_file(path: &Path) -> Result<FileReport> {
        let source = std::fs::read_to_string(path)?;
        Self::process_source(&source, &path.to_string_lossy())
    }

    /// Check fixture source text
    ///
    /// Every vector is evaluated; resolution failures abort the file.
    pub fn process_source(source: &str, file_path: &str) -> Result<FileReport> {
        let model = parse_source(source, file_path)?;
        let fixture = parse_fixture(source, file_path)?;
        let resolver = BinaryNameResolver::new(&model);

        let file_vectors = if fixture.file_vectors.is_empty() {
            Vec::new()
        } else {
            let top_level = resolver.top_level_binary_names();
            let declared = resolver.declared_binary_names();
            fixture
                .file_vectors
                .iter()
                .map(|v| check_file_vector(v, &top_level, &declared))
                .collect()
        };

        let vectors = fixture
            .element_vectors
            .iter()
            .map(|v| check_element_vector(&resolver, v))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            file = file_path,
            file_vectors = file_vectors.len(),
            vectors = vectors.len(),
            "Checked fixture"
        );
        Ok(FileReport {
            file_path: file_path.to_string(),
            file_vectors,
            vectors,
        })
    }
}

fn check_file_vector(
    vector: &FileTestVector,
    top_level: &[BinaryName],
    declared: &[BinaryName],
) -> FileVectorOutcome {
    FileVectorOutcome {
        line: vector.line,
        verdict: verify_file(vector, top_level, declared),
    }
}

fn check_element_vector(
    resolver: &BinaryNameResolver<'_>,
    vector: &ElementTestVector,
) -> Result<VectorOutcome> {
    let model = resolver.model();
    let element = model.element_at(vector.offset).ok_or_else(|| {
        LocateError::unresolved(
            &model.file_path,
            vector.reference.to_string(),
            format!("no declaration encloses the vector at line {}", vector.line),
        )
    })?;
    check_reference(model, vector, element);

    let actual = resolver.resolve(element)?;
    let expected = ExpectedResolution::from(vector);
    let verdict = verify(&expected, &actual);
    debug!(
        file = %model.file_path,
        line = vector.line,
        reference = %vector.reference,
        actual = %actual,
        pass = verdict.is_pass(),
        "Checked vector"
    );

    Ok(VectorOutcome {
        line: vector.line,
        reference: vector.reference.to_string(),
        expected,
        actual,
        verdict,
    })
}

/// Warn when the reference names an element that does not enclose the vector
fn check_reference(
    model: &SourceModel,
    vector: &ElementTestVector,
    element: NodeId,
) {
    let reference = &vector.reference;
    let named = model.find_by_reference(
        &reference.owner_segments(),
        reference.kind.executable_kind(),
        &reference.member,
    );
    if let Some(named) = named {
        if !model.ancestors(element).any(|n| n.id() == named) {
            warn!(
                file = %model.file_path,
                line = vector.line,
                reference = %reference,
                "Reference does not enclose the vector; checking the enclosing element"
            );
        }
    }
}
