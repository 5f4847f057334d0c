use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// A source file and the module name derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub module_name: String,
}

impl SourceFile {
    /// Module name is the lowercased file name with the extension stripped.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_string_lossy().to_lowercase();
        Some(Self {
            path: path.to_path_buf(),
            module_name: stem,
        })
    }
}

pub struct FileDiscovery {
    extension: String,
}

impl FileDiscovery {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Lists the files directly inside `dir` whose name ends with the
    /// extension. Subdirectories are not searched.
    ///
    /// A directory that does not exist contributes no files.
    pub fn discover(&self, dir: &Path) -> crate::Result<Vec<SourceFile>> {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "source directory not found, skipping");
            return Ok(Vec::new());
        }

        let base = normalize_dir(dir);
        let root = if base.as_os_str().is_empty() {
            Path::new(".")
        } else {
            base.as_path()
        };

        let mut walker_builder = WalkBuilder::new(root);
        walker_builder
            .standard_filters(false) // plain listing, no .gitignore handling
            .follow_links(true)
            .max_depth(Some(1));

        let suffix = format!(".{}", self.extension);
        let mut files = Vec::new();

        for result in walker_builder.build() {
            let entry = result?;

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(&suffix) {
                continue;
            }

            let path = base.join(entry.file_name());
            if let Some(file) = SourceFile::from_path(&path) {
                debug!(module = %file.module_name, file = %path.display(), "discovered source");
                files.push(file);
            }
        }

        Ok(files)
    }

    /// Concatenates the listings of `dirs`, in the order given.
    pub fn discover_all(&self, dirs: &[&Path]) -> crate::Result<Vec<SourceFile>> {
        let mut files = Vec::new();
        for dir in dirs {
            files.extend(self.discover(dir)?);
        }
        Ok(files)
    }
}

/// Drops `.` components and redundant separators, so `./hdl/` and `hdl`
/// print the same. The current directory becomes an empty path.
fn normalize_dir(dir: &Path) -> PathBuf {
    dir.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[SourceFile]) -> Vec<String> {
        let mut names: Vec<_> = files.iter().map(|f| f.module_name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn lists_only_matching_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("adder.v"), "").unwrap();
        fs::write(temp.path().join("Mux2.v"), "").unwrap();
        fs::write(temp.path().join("top.sv"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();

        let files = FileDiscovery::new("v").discover(temp.path()).unwrap();
        assert_eq!(names(&files), vec!["adder", "mux2"]);
    }

    #[test]
    fn does_not_recurse() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("deep.v"), "").unwrap();
        fs::write(temp.path().join("top.v"), "").unwrap();

        let files = FileDiscovery::new("v").discover(temp.path()).unwrap();
        assert_eq!(names(&files), vec!["top"]);
    }

    #[test]
    fn skips_directories_named_like_sources() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("fake.v")).unwrap();

        let files = FileDiscovery::new("v").discover(temp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let files = FileDiscovery::new("v")
            .discover(&temp.path().join("does-not-exist"))
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn discover_all_keeps_directory_order() {
        let hdl = TempDir::new().unwrap();
        let sim = TempDir::new().unwrap();
        fs::write(hdl.path().join("core.vhdl"), "").unwrap();
        fs::write(sim.path().join("core_tb.vhdl"), "").unwrap();

        let files = FileDiscovery::new("vhdl")
            .discover_all(&[hdl.path(), sim.path()])
            .unwrap();
        let ordered: Vec<_> = files.iter().map(|f| f.module_name.as_str()).collect();
        assert_eq!(ordered, vec!["core", "core_tb"]);
    }

    #[test]
    fn listed_paths_drop_dot_components_and_trailing_separators() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("hdl")).unwrap();
        fs::write(temp.path().join("hdl").join("adder.v"), "").unwrap();

        let messy = PathBuf::from(format!("{}/./hdl//", temp.path().display()));
        let files = FileDiscovery::new("v").discover(&messy).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, temp.path().join("hdl").join("adder.v"));
    }

    #[test]
    fn normalize_dir_matches_plain_spelling() {
        assert_eq!(normalize_dir(Path::new("./hdl")), PathBuf::from("hdl"));
        assert_eq!(normalize_dir(Path::new("sim//")), PathBuf::from("sim"));
        assert_eq!(normalize_dir(Path::new("a/./b/")), PathBuf::from("a/b"));
        assert_eq!(normalize_dir(Path::new(".")), PathBuf::new());
    }

    #[test]
    fn module_name_strips_only_last_extension() {
        let file = SourceFile::from_path(Path::new("rtl/My.Core.sv")).unwrap();
        assert_eq!(file.module_name, "my.core");
    }
}
