use crate::dependency_graph::DuplicatePolicy;
use crate::error::AnalyzerError;
use crate::extractor::VhdlCapture;
use crate::language::Language;
use crate::reporter::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings as they appear in a TOML config file. Every field is optional so
/// a file can supply any subset and leave the rest to the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub language: Option<Language>,
    pub testbenches: Option<Vec<String>>,
    pub hdl_dir: Option<PathBuf>,
    pub sim_dir: Option<PathBuf>,
    pub duplicates: Option<DuplicatePolicy>,
    pub vhdl_capture: Option<VhdlCapture>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    /// Load config from a specific file path
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub language: Language,
    /// Root module names, lowercased.
    pub testbenches: Vec<String>,
    pub hdl_dir: PathBuf,
    pub sim_dir: PathBuf,
    pub duplicates: DuplicatePolicy,
    pub vhdl_capture: VhdlCapture,
    pub format: OutputFormat,
}

impl Config {
    pub fn new(
        language: Language,
        testbenches: &str,
        hdl_dir: impl Into<PathBuf>,
        sim_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            language,
            testbenches: split_testbenches(testbenches),
            hdl_dir: hdl_dir.into(),
            sim_dir: sim_dir.into(),
            duplicates: DuplicatePolicy::default(),
            vhdl_capture: VhdlCapture::default(),
            format: OutputFormat::default(),
        }
    }

    pub fn extension(&self) -> &'static str {
        self.language.extension()
    }

    /// Save config to a file
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Create a config file with all available options documented
    pub fn create_documented_config() -> String {
        r#"# hdl-deps configuration file
# Any value given on the command line overrides the value here.

# HDL dialect: "verilog" (.v), "sv" (.sv) or "vhdl" (.vhdl)
language = "verilog"

# Testbench (root) module names
testbenches = ["top_tb"]

# Directory with design sources (not searched recursively)
hdl_dir = "src/hdl"

# Directory with simulation sources (not searched recursively)
sim_dir = "src/sim"

# Two files with the same module name: "warn", "ignore" or "error"
duplicates = "warn"

# VHDL only: take the "entity" name or the instance "label"
vhdl_capture = "entity"

# Output: "plain" (one line of paths) or "json"
format = "plain"
"#
        .to_string()
    }
}

/// Command-line values layered over a [`FileConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub language: Option<Language>,
    pub testbenches: Option<String>,
    pub hdl_dir: Option<PathBuf>,
    pub sim_dir: Option<PathBuf>,
    pub duplicates: Option<DuplicatePolicy>,
    pub vhdl_capture: Option<VhdlCapture>,
    pub format: Option<OutputFormat>,
}

impl ConfigOverrides {
    /// Merges over `base` and checks that every required value is present.
    pub fn apply(self, base: FileConfig) -> crate::Result<Config> {
        let language = self
            .language
            .or(base.language)
            .ok_or(AnalyzerError::MissingOption("--lang"))?;

        let testbenches = match self.testbenches {
            Some(tbs) => split_testbenches(&tbs),
            None => base
                .testbenches
                .unwrap_or_default()
                .into_iter()
                .flat_map(|tb| split_testbenches(&tb))
                .collect(),
        };
        if testbenches.is_empty() {
            return Err(AnalyzerError::MissingOption("--tbs").into());
        }

        let hdl_dir = self
            .hdl_dir
            .or(base.hdl_dir)
            .ok_or(AnalyzerError::MissingOption("--hdl-dir"))?;
        let sim_dir = self
            .sim_dir
            .or(base.sim_dir)
            .ok_or(AnalyzerError::MissingOption("--sim-dir"))?;

        Ok(Config {
            language,
            testbenches,
            hdl_dir,
            sim_dir,
            duplicates: self.duplicates.or(base.duplicates).unwrap_or_default(),
            vhdl_capture: self.vhdl_capture.or(base.vhdl_capture).unwrap_or_default(),
            format: self.format.or(base.format).unwrap_or_default(),
        })
    }
}

/// Splits a whitespace-separated list of testbench names and lowercases them.
pub fn split_testbenches(tbs: &str) -> Vec<String> {
    tbs.split_whitespace().map(str::to_lowercase).collect()
}
