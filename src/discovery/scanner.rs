//! Project scanner for discovering built sub-projects.

use crate::discovery::output::{BuildOutput, BuildOutputLocator, DirNameLocator};
use crate::error::{AssembleError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A sub-project with a usable build output.
#[derive(Debug, Clone)]
pub struct DiscoveredProject {
    /// Sub-project directory.
    pub root: PathBuf,
    /// Directory basename, used as the project name.
    pub name: String,
    /// Located build output.
    pub output: BuildOutput,
}

/// A sub-project that was found but cannot be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProject {
    pub root: PathBuf,
    pub name: String,
    pub reason: String,
}

/// Result of scanning the projects directory.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub projects: Vec<DiscoveredProject>,
    pub skipped: Vec<SkippedProject>,
}

/// Scanner for discovering sub-projects in a parent directory.
pub struct ProjectScanner {
    manifest_file: String,
    locator: Box<dyn BuildOutputLocator>,
}

impl ProjectScanner {
    /// Create a scanner that treats `manifest_file` as the discovery signal.
    pub fn new(manifest_file: impl Into<String>, locator: Box<dyn BuildOutputLocator>) -> Self {
        Self {
            manifest_file: manifest_file.into(),
            locator,
        }
    }

    /// Scanner for the configured manifest and output directory names.
    pub fn from_config(config: &crate::config::DiscoveryConfig) -> Self {
        Self::new(
            config.manifest_file.clone(),
            Box::new(DirNameLocator::new(config.output_dir_names.iter().cloned())),
        )
    }

    /// Scan the immediate children of `projects_dir`.
    ///
    /// Projects are returned in lexical order of directory name. Candidates
    /// without a build output go to `skipped`; directories without a
    /// manifest are ignored.
    pub fn scan(&self, projects_dir: &Path) -> Result<ScanReport> {
        if !projects_dir.is_dir() {
            return Err(AssembleError::ProjectsDirNotFound(
                projects_dir.to_path_buf(),
            ));
        }

        let mut report = ScanReport::default();

        let walker = WalkDir::new(projects_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(projects_dir).to_path_buf();
                AssembleError::io(path, e.into())
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            let root = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if !root.join(&self.manifest_file).is_file() {
                tracing::debug!(path = %root.display(), "No manifest, not a project");
                continue;
            }

            match self.locator.locate(root) {
                Some(output) => {
                    tracing::debug!(
                        project = %name,
                        output = %output.root.display(),
                        "Found build output"
                    );
                    report.projects.push(DiscoveredProject {
                        root: root.to_path_buf(),
                        name,
                        output,
                    });
                }
                None => {
                    tracing::warn!(project = %name, "No build output found, skipping");
                    report.skipped.push(SkippedProject {
                        root: root.to_path_buf(),
                        name,
                        reason: "no build output directory with index.html".to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new("package.json", Box::new(DirNameLocator::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();

        // Vite-style project
        let vite = tmp.path().join("vite-react");
        fs::create_dir_all(vite.join("dist/assets")).unwrap();
        fs::write(vite.join("package.json"), "{}").unwrap();
        fs::write(vite.join("dist/index.html"), "<html></html>").unwrap();

        // CRA-style project
        let cra = tmp.path().join("cra-mobx");
        fs::create_dir_all(cra.join("build")).unwrap();
        fs::write(cra.join("package.json"), "{}").unwrap();
        fs::write(cra.join("build/index.html"), "<html></html>").unwrap();

        // Project that was never built
        let unbuilt = tmp.path().join("unbuilt");
        fs::create_dir_all(unbuilt.join("src")).unwrap();
        fs::write(unbuilt.join("package.json"), "{}").unwrap();

        // Regular directory (not a project)
        fs::create_dir_all(tmp.path().join("docs/dist")).unwrap();
        fs::write(tmp.path().join("docs/dist/index.html"), "").unwrap();

        // Stray file
        fs::write(tmp.path().join("README.md"), "hello").unwrap();

        tmp
    }

    #[test]
    fn test_scan_finds_built_projects() {
        let tmp = setup_test_tree();
        let report = ProjectScanner::default().scan(tmp.path()).unwrap();

        let names: Vec<&str> = report.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cra-mobx", "vite-react"]);

        let outputs: Vec<String> = report.projects.iter().map(|p| p.output.dir_name()).collect();
        assert_eq!(outputs, vec!["build", "dist"]);
    }

    #[test]
    fn test_scan_reports_unbuilt_projects() {
        let tmp = setup_test_tree();
        let report = ProjectScanner::default().scan(tmp.path()).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "unbuilt");
    }

    #[test]
    fn test_scan_ignores_directories_without_manifest() {
        let tmp = setup_test_tree();
        let report = ProjectScanner::default().scan(tmp.path()).unwrap();

        assert!(report.projects.iter().all(|p| p.name != "docs"));
        assert!(report.skipped.iter().all(|p| p.name != "docs"));
    }

    #[test]
    fn test_scan_does_not_recurse() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("group/inner");
        fs::create_dir_all(nested.join("dist")).unwrap();
        fs::write(nested.join("package.json"), "{}").unwrap();
        fs::write(nested.join("dist/index.html"), "").unwrap();

        let report = ProjectScanner::default().scan(tmp.path()).unwrap();
        assert!(report.projects.is_empty());
    }

    #[test]
    fn test_scan_custom_manifest() {
        let tmp = TempDir::new().unwrap();
        let proj = tmp.path().join("app");
        fs::create_dir_all(proj.join("out")).unwrap();
        fs::write(proj.join("deno.json"), "{}").unwrap();
        fs::write(proj.join("out/index.html"), "").unwrap();

        let scanner = ProjectScanner::new("deno.json", Box::new(DirNameLocator::new(["out"])));
        let report = scanner.scan(tmp.path()).unwrap();

        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].output.dir_name(), "out");
    }

    #[test]
    fn test_scan_missing_projects_dir() {
        let tmp = TempDir::new().unwrap();
        let result = ProjectScanner::default().scan(&tmp.path().join("nope"));

        assert!(matches!(result, Err(AssembleError::ProjectsDirNotFound(_))));
    }
}
