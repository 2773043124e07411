/*
 * Classlocate IR - Source Element to Binary Class Resolution
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, ScopeStack)
 * - features/    : Vertical slices (parsing → resolution → verification)
 * - config/      : Versioned YAML run configuration
 *
 * Performance:
 * - One immutable SourceModel per file, no cross-file state
 * - Rayon work-stealing across fixture files
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::collapsible_if)] // Readability over brevity

use std::sync::Once;

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (vertical slices)
pub mod features;

/// Run configuration
pub mod config;

/// Error types
pub mod errors;

pub use errors::{LocateError, Result};
pub use features::parsing::{parse_file, parse_source, SourceModel};
pub use features::resolution::{BinaryNameResolver, ResolutionResult};
pub use features::verification::{FixtureRunner, RunReport, Verdict};

static INIT_RAYON: Once = Once::new();

/// Initialize the global Rayon thread pool
///
/// Uses 75% of available cores so the host stays responsive.
/// Safe to call multiple times; only the first call takes effect.
pub fn init_rayon() {
    INIT_RAYON.call_once(|| {
        let num_threads = default_thread_count();
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("classlocate-worker-{}", i))
            .build_global()
        {
            tracing::debug!("Rayon global pool already initialized: {}", e);
        }
    });
}

/// Default worker count: 75% of logical cores, at least one
pub fn default_thread_count() -> usize {
    (num_cpus::get() * 3 / 4).max(1)
}
