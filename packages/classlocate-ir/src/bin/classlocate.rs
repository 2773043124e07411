//! Classlocate CLI
//!
//! # Usage
//!
//! ```bash
//! # Check every fixture under a source root
//! cargo run --bin classlocate --release -- verify testProject/src/main/java
//!
//! # Resolve the element at a position
//! cargo run --bin classlocate -- resolve foo/bar/JavaNestedClasses.java --line 12 --column 8
//!
//! # List the binary classes a file compiles into
//! cargo run --bin classlocate -- classes foo/bar/JavaNestedClasses.java
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use classlocate_ir::config::{ReportFormat, RunConfig};
use classlocate_ir::features::verification::report::{
    JsonReporter, MarkdownReporter, TerminalReporter,
};
use classlocate_ir::features::verification::{ElementReference, FixtureRunner};
use classlocate_ir::{parse_file, BinaryNameResolver};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "classlocate")]
#[command(about = "Resolve source elements to the binary classes they compile into", long_about = None)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check test vectors embedded in fixture sources
    Verify {
        /// Files or directories to scan (overrides config roots)
        paths: Vec<PathBuf>,

        /// YAML run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<ReportFormat>,

        /// Output directory for JSON and Markdown reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Resolve one element of a source file
    Resolve {
        file: PathBuf,

        /// 1-based line
        #[arg(short, long, required_unless_present = "reference")]
        line: Option<u32>,

        /// 0-based column
        #[arg(long, default_value = "0")]
        column: u32,

        /// Element reference, e.g. `METHOD|Outer$Inner#run`
        #[arg(short, long, conflicts_with = "line")]
        reference: Option<String>,
    },

    /// List every binary class declared in a source file
    Classes { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Verify {
            paths,
            config,
            format,
            output,
            threads,
        } => verify(paths, config, format, output, threads),
        Commands::Resolve {
            file,
            line,
            column,
            reference,
        } => resolve(&file, line, column, reference.as_deref()).map(|_| true),
        Commands::Classes { file } => classes(&file).map(|_| true),
    }
}

fn verify(
    paths: Vec<PathBuf>,
    config: Option<PathBuf>,
    format: Option<ReportFormat>,
    output: Option<PathBuf>,
    threads: Option<usize>,
) -> anyhow::Result<bool> {
    let mut config = match config {
        Some(path) => RunConfig::from_yaml(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RunConfig::default(),
    };
    if !paths.is_empty() {
        config.roots = paths;
    }
    if let Some(format) = format {
        config = config.format(format);
    }
    if let Some(dir) = output {
        config = config.output_dir(dir);
    }
    if let Some(threads) = threads {
        config = config.threads(threads);
    }
    config.validate()?;

    let report_config = config.report.clone();
    let report = FixtureRunner::new(config).run()?;

    match report_config.format {
        ReportFormat::Terminal => TerminalReporter::print(&report),
        ReportFormat::Json => {
            let path = JsonReporter::save(&report, &report_config.output_dir)?;
            println!("JSON report: {}", path.display());
        }
        ReportFormat::Markdown => {
            let path = MarkdownReporter::save(&report, &report_config.output_dir)?;
            println!("Markdown report: {}", path.display());
        }
    }
    println!("{}", report.summary());

    Ok(report.is_success())
}

fn resolve(
    file: &Path,
    line: Option<u32>,
    column: u32,
    reference: Option<&str>,
) -> anyhow::Result<()> {
    let model = parse_file(file)?;
    let resolver = BinaryNameResolver::new(&model);

    let result = match (line, reference) {
        (Some(line), _) => resolver.resolve_at_position(line, column)?,
        (None, Some(text)) => {
            let reference = ElementReference::parse(text).map_err(anyhow::Error::msg)?;
            let element = model
                .find_by_reference(
                    &reference.owner_segments(),
                    reference.kind.executable_kind(),
                    &reference.member,
                )
                .with_context(|| format!("{} not found in {}", reference, file.display()))?;
            resolver.resolve(element)?
        }
        (None, None) => bail!("either --line or --reference is required"),
    };

    println!("baseFqClassName:          {}", result.base_fq_class_name);
    println!("containingBinaryClassName: {}", result.containing_binary_class_name);
    println!("classFile:                {}", result.class_file_path());
    Ok(())
}

fn classes(file: &Path) -> anyhow::Result<()> {
    let model = parse_file(file)?;
    let resolver = BinaryNameResolver::new(&model);
    for name in resolver.declared_binary_names() {
        println!("{:<60} {}", name.qualified(), name.class_file_path());
    }
    Ok(())
}
