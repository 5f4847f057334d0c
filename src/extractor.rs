use crate::error::AnalyzerError;
use crate::language::{Language, PatternFamily};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::trace;

/// Built-in gate primitives. These never have a source file.
pub const PRIMITIVES: &[&str] = &["and", "or", "not", "xor", "nand", "nor", "buf"];

/// Which part of a VHDL `label : entity lib.name` line is taken as the submodule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VhdlCapture {
    /// The entity name after `library.`.
    #[default]
    Entity,
    /// The instance label before the colon.
    Label,
}

/// Line-oriented instantiation scanner for one language.
#[derive(Debug, Clone)]
pub struct Extractor {
    language: Language,
    pattern: Regex,
    capture_group: usize,
}

impl Extractor {
    pub fn new(language: Language, vhdl_capture: VhdlCapture) -> crate::Result<Self> {
        let (pattern, capture_group) = match language.pattern_family() {
            PatternFamily::CLike => {
                let pattern = Regex::new(r"^\s*(\w+)\s+\w+\s*\(").map_err(AnalyzerError::from)?;
                (pattern, 1)
            }
            PatternFamily::Entity => {
                // Only entity mode accepts `ENTITY`; label mode wants lowercase.
                let (source, group) = match vhdl_capture {
                    VhdlCapture::Entity => (r"^\s*(\w+)\s*:\s*(?i:entity)\s*(\w+)\.(\w+)", 3),
                    VhdlCapture::Label => (r"^\s*(\w+)\s*:\s*entity\s*(\w+)\.(\w+)", 1),
                };
                (Regex::new(source).map_err(AnalyzerError::from)?, group)
            }
        };

        Ok(Self {
            language,
            pattern,
            capture_group,
        })
    }

    /// Reads `path` and returns the submodules it instantiates.
    ///
    /// An unreadable file is fatal for the whole run, so the error is
    /// returned rather than skipped.
    pub fn extract_file(&self, path: &Path) -> crate::Result<Vec<String>> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let submodules = self.extract_str(&content);
        trace!(file = %path.display(), count = submodules.len(), "extracted instantiations");
        Ok(submodules)
    }

    /// Lowercased submodule names in order of appearance, duplicates kept.
    pub fn extract_str(&self, content: &str) -> Vec<String> {
        let comment = self.language.comment_marker();

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(comment))
            .filter_map(|line| self.match_line(line))
            .collect()
    }

    fn match_line(&self, line: &str) -> Option<String> {
        let captures = self.pattern.captures(line)?;
        let name = captures.get(self.capture_group)?.as_str().to_lowercase();

        if is_primitive(&name) {
            return None;
        }
        Some(name)
    }
}

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}
