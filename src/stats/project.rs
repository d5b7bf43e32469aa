use std::path::PathBuf;

use crate::discovery::DiscoveredProject;
use crate::error::Result;
use crate::meta::ProjectMeta;

use super::collector::{collect_file_stats, FileStat};
use super::size::{totals, SizeTotals};

/// Everything the pipeline knows about one built sub-project.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProjectStats {
    pub project_root: PathBuf,
    pub project_name: String,
    pub dist_dir_name: String,
    pub files: Vec<FileStat>,
    pub meta: ProjectMeta,
}

impl ProjectStats {
    /// Load metadata and measure the build output of `project`.
    pub fn gather(project: &DiscoveredProject, meta_file: &str, level: u32) -> Result<Self> {
        let meta = ProjectMeta::load(&project.root, meta_file);
        let files = collect_file_stats(&project.output.root, level)?;

        tracing::debug!(
            project = %project.name,
            files = files.len(),
            "Collected build output stats"
        );

        Ok(Self {
            project_root: project.root.clone(),
            project_name: project.name.clone(),
            dist_dir_name: project.output.dir_name(),
            files,
            meta,
        })
    }

    pub fn totals(&self) -> SizeTotals {
        totals(&self.files)
    }
}
