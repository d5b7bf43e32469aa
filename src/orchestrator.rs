//! Orchestrator for assembling the site.
//!
//! A run moves through fixed phases:
//!
//! ```text
//! OutputReset → SharedAssetPrepared → ProjectsProcessed → Done
//! ```
//!
//! The output root is emptied before anything is written; nothing from a
//! previous run is trusted.
//! Shared assets are hashed and written before any project page is injected,
//! since every page links them by hashed name. Projects are then processed in
//! parallel, each writing only under its own output directory. A project that
//! fails is reported and the others still publish.

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::assets::SharedAssets;
use crate::config::{clean_path, Config};
use crate::discovery::{DiscoveredProject, ProjectScanner, SkippedProject, ENTRY_HTML};
use crate::error::{AssembleError, Result};
use crate::inject::{inject_html, InjectConfig};
use crate::layout::LayoutData;
use crate::meta::TagRegistry;
use crate::stats::{ProjectStats, SizeTotals};

/// Outcome of publishing one project.
#[derive(Debug, Clone)]
pub enum ProjectOutcome {
    /// Project copied and injected.
    Published {
        name: String,
        out_dir: PathBuf,
        totals: SizeTotals,
    },
    /// Publishing failed; other projects are unaffected.
    Failed { name: String, error: String },
}

/// Summary of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub output_root: PathBuf,
    pub shared: Option<SharedAssets>,
    pub published: Vec<ProjectOutcome>,
    pub skipped: Vec<SkippedProject>,
    pub failed: Vec<ProjectOutcome>,
}

impl RunSummary {
    pub fn published_count(&self) -> usize {
        self.published.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Summed sizes across published projects.
    pub fn total(&self) -> SizeTotals {
        self.published
            .iter()
            .fold(SizeTotals::default(), |acc, outcome| match outcome {
                ProjectOutcome::Published { totals, .. } => SizeTotals {
                    files: acc.files + totals.files,
                    size: acc.size + totals.size,
                    compressed_size: acc.compressed_size + totals.compressed_size,
                },
                ProjectOutcome::Failed { .. } => acc,
            })
    }
}

/// Assembles all built sub-projects into the output root.
pub struct Orchestrator {
    config: Config,
    scanner: ProjectScanner,
    tags: &'static TagRegistry,
}

impl Orchestrator {
    /// Create an orchestrator for `config` using the built-in tag registry.
    pub fn new(config: Config) -> Self {
        let scanner = ProjectScanner::from_config(&config.discovery);
        Self {
            config,
            scanner,
            tags: TagRegistry::builtin(),
        }
    }

    /// Run the whole pipeline.
    ///
    /// Errors returned here are fatal for the run. Per-project failures are
    /// reported in the summary instead.
    pub fn run(&self, progress: Option<&ProgressBar>) -> Result<RunSummary> {
        let output_root = self.config.output_dir();
        let projects_dir = self.config.projects_dir();

        self.check_output_is_safe(&output_root)?;

        // Discovery only reads; doing it first keeps a missing projects dir
        // from wiping the previous output.
        let report = self.scanner.scan(&projects_dir)?;
        tracing::info!(
            found = report.projects.len(),
            skipped = report.skipped.len(),
            "Scanned {}",
            projects_dir.display()
        );

        reset_output_dir(&output_root)?;
        let shared = self.prepare_shared(&output_root)?;

        let inject = InjectConfig::for_site(&self.config, &shared, &output_root);
        if let Some(bar) = progress {
            bar.set_length(report.projects.len() as u64);
        }
        let outcomes = self.publish_all(&report.projects, &inject, progress)?;

        let (published, failed): (Vec<_>, Vec<_>) = outcomes
            .into_iter()
            .partition(|o| matches!(o, ProjectOutcome::Published { .. }));

        Ok(RunSummary {
            output_root,
            shared: Some(shared),
            published,
            skipped: report.skipped,
            failed,
        })
    }

    /// Copy the landing page and publish the hashed shared assets.
    fn prepare_shared(&self, output_root: &Path) -> Result<SharedAssets> {
        let landing = self.config.landing_dir();
        if !landing.is_dir() {
            return Err(AssembleError::SharedAssetMissing(landing));
        }
        copy_tree(&landing, output_root)?;
        tracing::info!(source = %landing.display(), "Copied landing page");

        SharedAssets::publish(
            &self.config.stylesheet(),
            &self.config.favicon(),
            output_root,
        )
    }

    /// Publish every project on a dedicated pool and wait for all of them.
    pub fn publish_all(
        &self,
        projects: &[DiscoveredProject],
        inject: &InjectConfig,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<ProjectOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.build.jobs)
            .build()
            .map_err(|e| AssembleError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| {
            projects
                .par_iter()
                .map(|project| {
                    let outcome = match self.publish_one(project, inject) {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::error!(project = %project.name, error = %e, "Failed to publish");
                            ProjectOutcome::Failed {
                                name: project.name.clone(),
                                error: e.to_string(),
                            }
                        }
                    };

                    if let Some(bar) = progress {
                        bar.inc(1);
                    }

                    outcome
                })
                .collect()
        }))
    }

    /// Gather stats, copy the build output, and inject its entry page.
    pub fn publish_one(&self, project: &DiscoveredProject, inject: &InjectConfig) -> Result<ProjectOutcome> {
        let stats = ProjectStats::gather(
            project,
            &self.config.discovery.meta_file,
            self.config.stats.compression_level,
        )?;
        let data = LayoutData::build(&stats, inject, self.tags);

        let out_dir = (inject.out_dir)(&stats);
        copy_tree(&project.output.root, &out_dir)?;

        let entry = out_dir.join(ENTRY_HTML);
        let html = fs::read_to_string(&project.output.entry_html)
            .map_err(|e| AssembleError::io(&project.output.entry_html, e))?;
        let injected = inject_html(&html, inject, &data)?;
        fs::write(&entry, injected).map_err(|e| AssembleError::io(&entry, e))?;

        tracing::info!(project = %stats.project_name, out = %out_dir.display(), "Published");

        Ok(ProjectOutcome::Published {
            name: stats.project_name.clone(),
            totals: stats.totals(),
            out_dir,
        })
    }

    /// The output root is emptied on every run; make sure that cannot take
    /// any input with it.
    fn check_output_is_safe(&self, output_root: &Path) -> Result<()> {
        let output = normalize(output_root);
        let protected = [
            self.config.paths.root.clone(),
            self.config.projects_dir(),
            self.config.landing_dir(),
            self.config.stylesheet(),
            self.config.favicon(),
        ];

        for path in protected {
            if normalize(&path).starts_with(&output) {
                return Err(AssembleError::UnsafeOutputDir {
                    output: output_root.to_path_buf(),
                    protected: path,
                });
            }
        }
        Ok(())
    }
}

/// Make `dir` exist and be empty.
pub fn reset_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| AssembleError::io(dir, e))?;

    for entry in fs::read_dir(dir).map_err(|e| AssembleError::io(dir, e))? {
        let entry = entry.map_err(|e| AssembleError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AssembleError::io(&path, e))?;

        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| AssembleError::io(&path, e))?;
    }

    tracing::debug!(path = %dir.display(), "Output directory reset");
    Ok(())
}

/// Copy the tree under `src` into `dest`.
///
/// Symlinks are recreated as links with the same target rather than
/// followed. Platforms without symlink support skip them.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for result in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = result.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            AssembleError::io(path, e.into())
        })?;

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| AssembleError::io(&target, e))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|e| AssembleError::io(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = fs::read_link(link).map_err(|e| AssembleError::io(link, e))?;
    std::os::unix::fs::symlink(&points_to, target).map_err(|e| AssembleError::io(target, e))?;
    tracing::debug!(path = %target.display(), to = %points_to.display(), "Copied symlink");
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, _target: &Path) -> Result<()> {
    tracing::debug!(path = %link.display(), "Skipping symlink");
    Ok(())
}

/// Absolute, lexically cleaned form of `path` for containment checks.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    clean_path(&absolute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Repository layout with one built project, one unbuilt, and shared assets.
    fn create_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        fs::create_dir_all(root.join("landing")).unwrap();
        fs::write(root.join("landing/index.html"), "<h1>All demos</h1>").unwrap();

        fs::create_dir_all(root.join("layout")).unwrap();
        fs::write(root.join("layout/layout.css"), ".layout{display:flex}").unwrap();
        fs::write(root.join("layout/favicon.svg"), "<svg/>").unwrap();

        let built = root.join("examples/vite-react");
        fs::create_dir_all(built.join("dist/assets")).unwrap();
        fs::write(built.join("package.json"), "{}").unwrap();
        fs::write(
            built.join("meta.json"),
            r#"{"title": "React Hooks", "stacks": ["react", "vite"]}"#,
        )
        .unwrap();
        fs::write(
            built.join("dist/index.html"),
            "<html><head><title>Vite App</title></head><body><div id=\"root\"></div></body></html>",
        )
        .unwrap();
        fs::write(built.join("dist/assets/index.js"), "render();".repeat(50)).unwrap();

        let unbuilt = root.join("examples/unbuilt");
        fs::create_dir_all(unbuilt.join("src")).unwrap();
        fs::write(unbuilt.join("package.json"), "{}").unwrap();

        tmp
    }

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.paths.root = root.to_path_buf();
        config.paths.output_dir = PathBuf::from("out");
        config.paths.landing_dir = PathBuf::from("landing");
        config.paths.stylesheet = PathBuf::from("layout/layout.css");
        config.paths.favicon = PathBuf::from("layout/favicon.svg");
        config.build.jobs = 2;
        config
    }

    #[test]
    fn test_run_publishes_built_projects() {
        let tmp = create_repo();
        let orchestrator = Orchestrator::new(test_config(tmp.path()));

        let summary = orchestrator.run(None).unwrap();

        assert_eq!(summary.published_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.failed_count(), 0);
        assert_eq!(summary.skipped[0].name, "unbuilt");

        let out = tmp.path().join("out");
        assert!(out.join("index.html").is_file());
        assert!(out.join("examples/vite-react/assets/index.js").is_file());
        assert!(!out.join("examples/unbuilt").exists());
    }

    #[test]
    fn test_run_injects_entry_page() {
        let tmp = create_repo();
        let summary = Orchestrator::new(test_config(tmp.path())).run(None).unwrap();
        let shared = summary.shared.unwrap();

        let html =
            fs::read_to_string(tmp.path().join("out/examples/vite-react/index.html")).unwrap();

        assert!(html.contains("<title>React Hooks | TodoMVC Once More</title>"));
        assert!(html.contains(&format!("href=\"../../{}\"", shared.stylesheet.file_name)));
        assert!(html.contains(&format!("href=\"../../{}\"", shared.favicon.file_name)));
        assert!(html.contains("\"projectName\":\"vite-react\""));
        assert!(!html.contains("Vite App"));
    }

    #[test]
    fn test_run_leaves_source_build_untouched() {
        let tmp = create_repo();
        Orchestrator::new(test_config(tmp.path())).run(None).unwrap();

        let original =
            fs::read_to_string(tmp.path().join("examples/vite-react/dist/index.html")).unwrap();
        assert!(original.contains("<title>Vite App</title>"));
    }

    #[test]
    fn test_run_clears_previous_output() {
        let tmp = create_repo();
        let stale = tmp.path().join("out/examples/removed-demo");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("index.html"), "old").unwrap();
        fs::write(tmp.path().join("out/deadbeef.css"), "old").unwrap();

        Orchestrator::new(test_config(tmp.path())).run(None).unwrap();

        assert!(!stale.exists());
        assert!(!tmp.path().join("out/deadbeef.css").exists());
    }

    #[test]
    fn test_missing_stylesheet_is_fatal() {
        let tmp = create_repo();
        fs::remove_file(tmp.path().join("layout/layout.css")).unwrap();

        let err = Orchestrator::new(test_config(tmp.path())).run(None).unwrap_err();

        match err {
            AssembleError::SharedAssetMissing(path) => assert!(path.ends_with("layout.css")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!tmp.path().join("out/examples").exists());
    }

    #[test]
    fn test_missing_landing_is_fatal() {
        let tmp = create_repo();
        fs::remove_dir_all(tmp.path().join("landing")).unwrap();

        let err = Orchestrator::new(test_config(tmp.path())).run(None).unwrap_err();
        assert!(matches!(err, AssembleError::SharedAssetMissing(_)));
    }

    #[test]
    fn test_refuses_output_containing_projects() {
        let tmp = create_repo();
        let mut config = test_config(tmp.path());
        config.paths.output_dir = PathBuf::from(".");

        let err = Orchestrator::new(config).run(None).unwrap_err();

        assert!(matches!(err, AssembleError::UnsafeOutputDir { .. }));
        assert!(tmp.path().join("examples/vite-react/package.json").exists());
    }

    #[test]
    fn test_failed_project_does_not_stop_others() {
        let tmp = create_repo();
        let second = tmp.path().join("examples/cra-app");
        fs::create_dir_all(second.join("build")).unwrap();
        fs::write(second.join("package.json"), "{}").unwrap();
        fs::write(second.join("build/index.html"), "<html><body></body></html>").unwrap();

        let config = test_config(tmp.path());
        let orchestrator = Orchestrator::new(config.clone());
        let report = ProjectScanner::from_config(&config.discovery)
            .scan(&config.projects_dir())
            .unwrap();
        assert_eq!(report.projects.len(), 2);

        // Block the output location of one project with a regular file.
        let out = tmp.path().join("out");
        reset_output_dir(&out).unwrap();
        fs::create_dir_all(out.join("examples")).unwrap();
        fs::write(out.join("examples/cra-app"), "not a directory").unwrap();

        let shared = SharedAssets::publish(
            &config.stylesheet(),
            &config.favicon(),
            &out,
        )
        .unwrap();
        let inject = InjectConfig::for_site(&config, &shared, &out);
        let outcomes = orchestrator.publish_all(&report.projects, &inject, None).unwrap();

        let failed: Vec<&ProjectOutcome> = outcomes
            .iter()
            .filter(|o| matches!(o, ProjectOutcome::Failed { .. }))
            .collect();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(failed.len(), 1);
        assert!(matches!(failed[0], ProjectOutcome::Failed { name, .. } if name == "cra-app"));
        assert!(out.join("examples/vite-react/index.html").is_file());
    }

    #[test]
    fn test_progress_counts_every_project() {
        let tmp = create_repo();
        let bar = ProgressBar::hidden();
        bar.set_length(1);

        Orchestrator::new(test_config(tmp.path())).run(Some(&bar)).unwrap();

        assert_eq!(bar.position(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let summary = RunSummary {
            published: vec![
                ProjectOutcome::Published {
                    name: "a".into(),
                    out_dir: PathBuf::from("/o/a"),
                    totals: SizeTotals {
                        files: 2,
                        size: 100,
                        compressed_size: 40,
                    },
                },
                ProjectOutcome::Published {
                    name: "b".into(),
                    out_dir: PathBuf::from("/o/b"),
                    totals: SizeTotals {
                        files: 1,
                        size: 50,
                        compressed_size: 30,
                    },
                },
            ],
            ..Default::default()
        };

        let total = summary.total();
        assert_eq!(total.files, 3);
        assert_eq!(total.size, 150);
        assert_eq!(total.compressed_size, 70);
    }

    #[test]
    fn test_copy_tree_preserves_layout() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("a/b/c.txt"), "deep").unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();

        let dest = tmp.path().join("dest/nested");
        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a/b/c.txt")).unwrap(), "deep");
        assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "top");
    }

    #[test]
    fn test_reset_output_dir_creates_and_empties() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");

        reset_output_dir(&out).unwrap();
        assert!(out.is_dir());

        fs::create_dir_all(out.join("x/y")).unwrap();
        fs::write(out.join("file"), "1").unwrap();
        reset_output_dir(&out).unwrap();

        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_keeps_symlinks() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("assets")).unwrap();
        fs::write(src.join("assets/app.3f2a.js"), "run()").unwrap();
        std::os::unix::fs::symlink("app.3f2a.js", src.join("assets/app.js")).unwrap();

        let dest = tmp.path().join("dest");
        copy_tree(&src, &dest).unwrap();

        let link = dest.join("assets/app.js");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("app.3f2a.js"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "run()");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }
}
