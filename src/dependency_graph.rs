use crate::error::AnalyzerError;
use crate::extractor::Extractor;
use crate::file_discovery::SourceFile;
use petgraph::{graph::NodeIndex, Directed, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Edges run from a parent module to each module it instantiates.
pub type ModuleGraph = Graph<ModuleNode, (), Directed>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleNode {
    pub name: String,
    /// `None` when the module is instantiated somewhere but no file defines it.
    pub file_path: Option<PathBuf>,
    /// Instantiated submodule names in source order, duplicates kept.
    pub instances: Vec<String>,
}

/// What to do when two files map to the same module name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the later file and log a warning.
    #[default]
    Warn,
    /// Keep the later file silently.
    Ignore,
    /// Abort the run.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateModule {
    pub module: String,
    pub kept: PathBuf,
    pub shadowed: PathBuf,
}

/// Module-level dependency graph plus the module → file index.
///
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: ModuleGraph,
    node_map: HashMap<String, NodeIndex>,
    file_index: HashMap<String, PathBuf>,
    duplicates: Vec<DuplicateModule>,
}

impl DependencyGraph {
    /// Assembles a graph from `(name, file, instances)` triples.
    ///
    /// A repeated name replaces the earlier entry. Instantiated names without
    /// an entry of their own become fileless nodes.
    pub fn from_modules<I>(modules: I) -> Self
    where
        I: IntoIterator<Item = (String, PathBuf, Vec<String>)>,
    {
        let mut graph = ModuleGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut file_index = HashMap::new();

        for (name, path, instances) in modules {
            let node = ModuleNode {
                name: name.clone(),
                file_path: Some(path.clone()),
                instances,
            };
            match node_map.get(&name) {
                Some(&idx) => graph[idx] = node,
                None => {
                    let idx = graph.add_node(node);
                    node_map.insert(name.clone(), idx);
                }
            }
            file_index.insert(name, path);
        }

        let parents: Vec<NodeIndex> = graph.node_indices().collect();
        for parent in parents {
            let instances = graph[parent].instances.clone();
            for child_name in instances {
                let child = match node_map.get(&child_name) {
                    Some(&idx) => idx,
                    None => {
                        let idx = graph.add_node(ModuleNode {
                            name: child_name.clone(),
                            file_path: None,
                            instances: Vec::new(),
                        });
                        node_map.insert(child_name, idx);
                        idx
                    }
                };
                graph.add_edge(parent, child, ());
            }
        }

        Self {
            graph,
            node_map,
            file_index,
            duplicates: Vec::new(),
        }
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Direct instances of `name`. Empty for unknown or fileless modules.
    pub fn submodules(&self, name: &str) -> &[String] {
        self.node_index(name)
            .map(|idx| self.graph[idx].instances.as_slice())
            .unwrap_or(&[])
    }

    pub fn file_for(&self, name: &str) -> Option<&Path> {
        self.file_index.get(name).map(PathBuf::as_path)
    }

    pub fn duplicates(&self) -> &[DuplicateModule] {
        &self.duplicates
    }

    /// Number of modules backed by a source file.
    pub fn module_count(&self) -> usize {
        self.file_index.len()
    }

    /// Names that are instantiated but have no source file, sorted.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .graph
            .node_weights()
            .filter(|node| node.file_path.is_none())
            .map(|node| node.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            modules: self.module_count(),
            instantiations: self.graph.edge_count(),
            unresolved: self.graph.node_count() - self.module_count(),
            duplicates: self.duplicates.len(),
        }
    }
}

pub struct GraphBuilder {
    extractor: Extractor,
    duplicate_policy: DuplicatePolicy,
}

impl GraphBuilder {
    pub fn new(extractor: Extractor, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            extractor,
            duplicate_policy,
        }
    }

    /// Reads every file and assembles the graph.
    ///
    /// Files are processed in the order given; on a module name collision the
    /// later file replaces the earlier one unless the policy is `Error`.
    pub fn build(&self, files: &[SourceFile]) -> crate::Result<DependencyGraph> {
        let mut modules: Vec<(String, PathBuf, Vec<String>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for file in files {
            let existing = positions.get(&file.module_name).copied();
            if let Some(pos) = existing {
                let duplicate = DuplicateModule {
                    module: file.module_name.clone(),
                    kept: file.path.clone(),
                    shadowed: modules[pos].1.clone(),
                };
                self.on_duplicate(&duplicate)?;
                duplicates.push(duplicate);
            }

            let instances = self.extractor.extract_file(&file.path)?;
            debug!(
                module = %file.module_name,
                file = %file.path.display(),
                instances = instances.len(),
                "parsed module"
            );

            let entry = (file.module_name.clone(), file.path.clone(), instances);
            match existing {
                Some(pos) => modules[pos] = entry,
                None => {
                    positions.insert(file.module_name.clone(), modules.len());
                    modules.push(entry);
                }
            }
        }

        let mut graph = DependencyGraph::from_modules(modules);
        graph.duplicates = duplicates;
        graph.stats().log_summary();
        Ok(graph)
    }

    fn on_duplicate(&self, duplicate: &DuplicateModule) -> crate::Result<()> {
        match self.duplicate_policy {
            DuplicatePolicy::Ignore => Ok(()),
            DuplicatePolicy::Warn => {
                warn!(
                    module = %duplicate.module,
                    kept = %duplicate.kept.display(),
                    shadowed = %duplicate.shadowed.display(),
                    "duplicate module name, later file wins"
                );
                Ok(())
            }
            DuplicatePolicy::Error => Err(AnalyzerError::DuplicateModule {
                module: duplicate.module.clone(),
                first: duplicate.shadowed.clone(),
                second: duplicate.kept.clone(),
            }
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub modules: usize,
    pub instantiations: usize,
    pub unresolved: usize,
    pub duplicates: usize,
}

impl GraphStats {
    pub fn log_summary(&self) {
        info!(
            modules = self.modules,
            instantiations = self.instantiations,
            unresolved = self.unresolved,
            duplicates = self.duplicates,
            "dependency graph built"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::VhdlCapture;
    use crate::language::Language;
    use std::fs;
    use tempfile::TempDir;

    fn builder(policy: DuplicatePolicy) -> GraphBuilder {
        let extractor = Extractor::new(Language::Verilog, VhdlCapture::default()).unwrap();
        GraphBuilder::new(extractor, policy)
    }

    fn write(dir: &Path, name: &str, content: &str) -> SourceFile {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        SourceFile::from_path(&path).unwrap()
    }

    #[test]
    fn builds_edges_and_file_index() {
        let temp = TempDir::new().unwrap();
        let files = vec![
            write(temp.path(), "adder.v", "mux2 m0 (.a(a));\n"),
            write(temp.path(), "mux2.v", "assign y = s ? b : a;\n"),
        ];

        let graph = builder(DuplicatePolicy::Warn).build(&files).unwrap();
        assert_eq!(graph.submodules("adder"), ["mux2".to_string()]);
        assert!(graph.submodules("mux2").is_empty());
        assert_eq!(graph.file_for("mux2"), Some(temp.path().join("mux2.v").as_path()));
        assert_eq!(graph.module_count(), 2);
        assert_eq!(graph.graph().edge_count(), 1);
        assert!(graph.unresolved().is_empty());
    }

    #[test]
    fn dangling_references_become_fileless_nodes() {
        let temp = TempDir::new().unwrap();
        let files = vec![write(temp.path(), "top.v", "ghost g0 (.x(x));\nghost g1 (.x(x));\n")];

        let graph = builder(DuplicatePolicy::Warn).build(&files).unwrap();
        assert!(graph.contains("ghost"));
        assert_eq!(graph.file_for("ghost"), None);
        assert_eq!(graph.unresolved(), vec!["ghost"]);
        assert_eq!(graph.stats().instantiations, 2);
        assert_eq!(graph.stats().unresolved, 1);
    }

    #[test]
    fn unknown_module_has_no_submodules() {
        let graph = builder(DuplicatePolicy::Warn).build(&[]).unwrap();
        assert!(graph.submodules("nothing").is_empty());
        assert!(!graph.contains("nothing"));
    }

    #[test]
    fn later_duplicate_wins_and_is_recorded() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let files = vec![
            write(first.path(), "Core.v", "alu a0 (.x(x));\n"),
            write(second.path(), "core.v", "fpu f0 (.x(x));\n"),
        ];

        let graph = builder(DuplicatePolicy::Warn).build(&files).unwrap();
        assert_eq!(graph.file_for("core"), Some(second.path().join("core.v").as_path()));
        assert_eq!(graph.submodules("core"), ["fpu".to_string()]);
        assert!(!graph.contains("alu"));
        assert_eq!(graph.duplicates().len(), 1);
        assert_eq!(graph.duplicates()[0].shadowed, first.path().join("Core.v"));
    }

    #[test]
    fn ignore_policy_still_overwrites() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let files = vec![
            write(first.path(), "core.v", ""),
            write(second.path(), "core.v", ""),
        ];

        let graph = builder(DuplicatePolicy::Ignore).build(&files).unwrap();
        assert_eq!(graph.file_for("core"), Some(second.path().join("core.v").as_path()));
    }

    #[test]
    fn error_policy_rejects_duplicates() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let files = vec![
            write(first.path(), "core.v", ""),
            write(second.path(), "CORE.v", ""),
        ];

        let err = builder(DuplicatePolicy::Error).build(&files).unwrap_err();
        match err.downcast_ref::<AnalyzerError>() {
            Some(AnalyzerError::DuplicateModule { module, .. }) => assert_eq!(module, "core"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn unreadable_file_aborts_build() {
        let temp = TempDir::new().unwrap();
        let missing = SourceFile::from_path(&temp.path().join("gone.v")).unwrap();

        assert!(builder(DuplicatePolicy::Warn).build(&[missing]).is_err());
    }
}
