//! Error types for dependency analysis.
//!
//! Library functions return [`crate::Result`], which wraps these variants so
//! callers can `downcast_ref::<AnalyzerError>()` when they need to branch on
//! the failure kind.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A source file could not be opened or read.
    #[error("failed to read source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the reachable modules has a source file.
    #[error(
        "couldn't find source files for testbenches: {testbenches:?} within hdl dir: {} and sim dir: {}",
        hdl_dir.display(),
        sim_dir.display()
    )]
    NoSourceFiles {
        testbenches: Vec<String>,
        hdl_dir: PathBuf,
        sim_dir: PathBuf,
    },

    /// Two files map to the same module name.
    #[error(
        "module '{module}' is defined by both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateModule {
        module: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A required option was given neither on the command line nor in the config file.
    #[error("missing required option: {0}")]
    MissingOption(&'static str),

    #[error("invalid instantiation pattern: {0}")]
    Pattern(#[from] regex::Error),
}
