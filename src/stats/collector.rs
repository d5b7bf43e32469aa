use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{AssembleError, Result};

use super::size::gzip_size;

/// Size measurements for one file of a build output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    /// Path relative to the output root, always `/`-separated
    pub path: String,
    /// Raw byte length on disk
    pub size: u64,
    /// Gzip-encoded byte length
    pub compressed_size: u64,
}

/// Measure every regular file under `root`.
///
/// Symlinks and directories are not listed. Files come back in lexical
/// path order so reports diff cleanly between runs.
pub fn collect_file_stats(root: &Path, level: u32) -> Result<Vec<FileStat>> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut files = Vec::new();

    for result in walker {
        let entry = result.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            AssembleError::io(path, e.into())
        })?;

        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                tracing::debug!(path = %entry.path().display(), "Skipping symlink");
            }
            continue;
        }

        let path = entry.path();
        let bytes = std::fs::read(path).map_err(|e| AssembleError::io(path, e))?;
        let compressed_size = gzip_size(&bytes, level).map_err(|e| AssembleError::io(path, e))?;

        files.push(FileStat {
            path: relative_slash_path(root, path),
            size: bytes.len() as u64,
            compressed_size,
        });
    }

    // Per-directory name order from walkdir is not full-path order
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
