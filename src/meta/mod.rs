//! Per-project metadata and the tag registry it refers to.

mod tags;

pub use tags::{TagInfo, TagRegistry};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata a sub-project declares about itself.
///
/// Tag ids are kept as written; they are resolved against the
/// [`TagRegistry`] when layout data is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    pub title: String,
    pub stacks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<Vec<String>>,
}

impl ProjectMeta {
    /// Load `file_name` from `project_root`.
    ///
    /// A missing or malformed file yields the default record. Publishing a
    /// build never fails because of its metadata.
    pub fn load(project_root: &Path, file_name: &str) -> Self {
        let path = project_root.join(file_name);

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No metadata file, using defaults");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unreadable metadata, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed metadata, using defaults");
                Self::default()
            }
        }
    }
}
