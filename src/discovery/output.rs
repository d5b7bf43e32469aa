//! Build output capability and locators.

use std::path::{Path, PathBuf};

/// Entry point every build output must contain at its root.
pub const ENTRY_HTML: &str = "index.html";

/// A built sub-project, as far as the pipeline cares.
///
/// Whatever tool produced it, a build output is a directory with an
/// `index.html` at its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// Build output directory.
    pub root: PathBuf,
    /// HTML entry point inside `root`.
    pub entry_html: PathBuf,
}

impl BuildOutput {
    /// Probe `dir` for an entry point.
    ///
    /// Returns `None` unless `dir` is a directory holding a regular
    /// `index.html`.
    pub fn probe(dir: &Path) -> Option<Self> {
        let entry_html = dir.join(ENTRY_HTML);
        (dir.is_dir() && entry_html.is_file()).then(|| Self {
            root: dir.to_path_buf(),
            entry_html,
        })
    }

    /// Basename of the output directory (e.g. `dist`).
    pub fn dir_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Trait for finding a project's build output.
///
/// Implement this to support a layout other than a fixed list of
/// directory names.
pub trait BuildOutputLocator: Send + Sync {
    /// Candidate output directories for a project, in precedence order.
    fn candidates(&self, project_root: &Path) -> Vec<PathBuf>;

    /// First candidate that is a usable build output.
    fn locate(&self, project_root: &Path) -> Option<BuildOutput> {
        self.candidates(project_root)
            .iter()
            .find_map(|dir| BuildOutput::probe(dir))
    }
}

/// Locator that checks conventional directory names in order.
///
/// The first name with an entry point wins, even when a later name also
/// has one.
#[derive(Debug, Clone)]
pub struct DirNameLocator {
    names: Vec<String>,
}

impl DirNameLocator {
    /// Create a locator for the given names, highest precedence first.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DirNameLocator {
    fn default() -> Self {
        Self::new(["dist", "build"])
    }
}

impl BuildOutputLocator for DirNameLocator {
    fn candidates(&self, project_root: &Path) -> Vec<PathBuf> {
        self.names.iter().map(|n| project_root.join(n)).collect()
    }
}
