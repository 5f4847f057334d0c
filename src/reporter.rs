use crate::analyzer::Analysis;
use crate::dependency_graph::{DuplicateModule, GraphStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Sorted paths on a single line, separated by spaces.
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub files: Vec<String>,
    pub modules: Vec<String>,
    /// Reachable modules with no source file.
    pub unresolved: Vec<String>,
    /// Files needed by each testbench on its own.
    pub testbenches: BTreeMap<String, Vec<String>>,
    pub duplicates: Vec<DuplicateModule>,
    pub stats: GraphStats,
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, analysis: &Analysis) -> crate::Result<String> {
        match self.format {
            OutputFormat::Plain => Ok(path_strings(&analysis.files).join(" ")),
            OutputFormat::Json => {
                let report = self.generate_report(analysis);
                Ok(serde_json::to_string_pretty(&report)?)
            }
        }
    }

    pub fn generate_report(&self, analysis: &Analysis) -> Report {
        Report {
            files: path_strings(&analysis.files),
            modules: analysis.reachable.iter().cloned().collect(),
            unresolved: analysis.unresolved.clone(),
            testbenches: analysis
                .per_testbench
                .iter()
                .map(|(tb, files)| (tb.clone(), path_strings(files)))
                .collect(),
            duplicates: analysis.duplicates.clone(),
            stats: analysis.stats,
        }
    }
}

fn path_strings(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}
