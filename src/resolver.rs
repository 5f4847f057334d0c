//! Reachability over the module graph.
//!
//! Traversal uses petgraph's stack-based [`Dfs`], so hierarchy depth is not
//! limited by the call stack. A node is marked discovered before its
//! children are pushed, which makes cycles and self-instantiation terminate
//! and expands each module at most once.

use crate::dependency_graph::DependencyGraph;
use petgraph::visit::Dfs;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

/// Module names required by a set of roots.
pub type ReachableSet = BTreeSet<String>;

/// Every module transitively instantiated by `roots`, roots included.
///
/// Roots that are not in the graph still appear in the result; they are just
/// not expanded.
pub fn resolve<S: AsRef<str>>(graph: &DependencyGraph, roots: &[S]) -> ReachableSet {
    let mut reachable = ReachableSet::new();
    let mut dfs = Dfs::empty(graph.graph());

    for root in roots {
        let root = root.as_ref();
        let Some(start) = graph.node_index(root) else {
            debug!(module = root, "root has no source file");
            reachable.insert(root.to_string());
            continue;
        };

        dfs.move_to(start);
        while let Some(idx) = dfs.next(graph.graph()) {
            reachable.insert(graph.graph()[idx].name.clone());
        }
    }

    reachable
}

/// Reachable set for each root separately.
pub fn resolve_per_root<S: AsRef<str>>(
    graph: &DependencyGraph,
    roots: &[S],
) -> BTreeMap<String, ReachableSet> {
    roots
        .iter()
        .map(|root| {
            let root = root.as_ref();
            (root.to_string(), resolve(graph, &[root]))
        })
        .collect()
}

/// Source files for `reachable`, sorted by path string.
///
/// Names without a file (dangling references, unknown roots) are dropped.
pub fn files_for(graph: &DependencyGraph, reachable: &ReachableSet) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = reachable
        .iter()
        .filter_map(|name| match graph.file_for(name) {
            Some(path) => Some(path.to_path_buf()),
            None => {
                debug!(module = %name, "no source file for reachable module");
                None
            }
        })
        .collect();
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    files
}
