pub mod analyzer;
pub mod config;
pub mod dependency_graph;
pub mod error;
pub mod extractor;
pub mod file_discovery;
pub mod language;
pub mod logger;
pub mod reporter;
pub mod resolver;

pub use analyzer::{Analysis, Analyzer};
pub use config::Config;
pub use dependency_graph::{DependencyGraph, GraphBuilder};
pub use error::AnalyzerError;
pub use extractor::Extractor;
pub use file_discovery::FileDiscovery;
pub use language::Language;
pub use reporter::Reporter;

pub type Result<T> = anyhow::Result<T>;
