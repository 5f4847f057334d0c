use crate::{
    config::Config,
    dependency_graph::{DependencyGraph, DuplicateModule, GraphBuilder, GraphStats},
    error::AnalyzerError,
    extractor::Extractor,
    file_discovery::FileDiscovery,
    resolver::{self, ReachableSet},
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Sorted source files needed by the testbenches.
    pub files: Vec<PathBuf>,
    pub reachable: ReachableSet,
    /// Reachable names with no source file, sorted.
    pub unresolved: Vec<String>,
    pub per_testbench: BTreeMap<String, Vec<PathBuf>>,
    pub duplicates: Vec<DuplicateModule>,
    pub stats: GraphStats,
}

pub struct Analyzer {
    config: Config,
    file_discovery: FileDiscovery,
    graph_builder: GraphBuilder,
}

impl Analyzer {
    pub fn new(config: Config) -> Result<Self> {
        let file_discovery = FileDiscovery::new(config.extension());
        let extractor = Extractor::new(config.language, config.vhdl_capture)?;
        let graph_builder = GraphBuilder::new(extractor, config.duplicates);

        Ok(Self {
            config,
            file_discovery,
            graph_builder,
        })
    }

    /// Scans both directories and builds the module graph.
    pub fn build_graph(&self) -> Result<DependencyGraph> {
        let files = self
            .file_discovery
            .discover_all(&[self.config.hdl_dir.as_path(), self.config.sim_dir.as_path()])?;
        info!(
            files = files.len(),
            language = %self.config.language,
            "discovered source files"
        );
        self.graph_builder.build(&files)
    }

    /// Resolves the testbenches against an already built graph.
    ///
    /// Fails when none of the reachable modules has a source file.
    pub fn resolve(&self, graph: &DependencyGraph) -> Result<Analysis> {
        let testbenches = self.config.testbenches.as_slice();
        let reachable = resolver::resolve(graph, testbenches);
        let files = resolver::files_for(graph, &reachable);

        if files.is_empty() {
            return Err(AnalyzerError::NoSourceFiles {
                testbenches: testbenches.to_vec(),
                hdl_dir: self.config.hdl_dir.clone(),
                sim_dir: self.config.sim_dir.clone(),
            }
            .into());
        }

        let unresolved: Vec<String> = reachable
            .iter()
            .filter(|name| graph.file_for(name).is_none())
            .cloned()
            .collect();
        for name in &unresolved {
            debug!(module = %name, "reachable module has no source file");
        }

        let per_testbench = resolver::resolve_per_root(graph, testbenches)
            .into_iter()
            .map(|(tb, set)| (tb, resolver::files_for(graph, &set)))
            .collect();

        info!(
            modules = reachable.len(),
            files = files.len(),
            unresolved = unresolved.len(),
            "resolved testbench dependencies"
        );

        Ok(Analysis {
            files,
            reachable,
            unresolved,
            per_testbench,
            duplicates: graph.duplicates().to_vec(),
            stats: graph.stats(),
        })
    }

    pub fn run(&self) -> Result<Analysis> {
        let graph = self.build_graph()?;
        self.resolve(&graph)
    }
}
