//! Run configuration
//!
//! Versioned YAML schema (`version: 1`) describing which fixture roots to scan,
//! which extensions to parse, how many workers to use and how to report.
//!
//! # Examples
//!
//! ```no_run
//! use classlocate_ir::config::RunConfig;
//!
//! let config = RunConfig::from_yaml("classlocate.yaml").unwrap();
//! println!("{}", config.describe());
//! ```

pub mod error;
pub mod run_config;

pub use error::{ConfigError, ConfigResult};
pub use run_config::{ReportConfig, ReportFormat, RunConfig, RunConfigV1};
