//! Layout data embedded into every project page.

use serde::Serialize;

use crate::inject::InjectConfig;
use crate::meta::{TagInfo, TagRegistry};
use crate::stats::{FileStat, ProjectStats};

/// Payload the shared header/footer chrome renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutData {
    pub back_url: String,
    pub base_url: String,
    pub github_url: String,
    pub source_url: String,
    pub stats: LayoutStats,
}

/// Serialized view of [`ProjectStats`].
///
/// The absolute project root is left out so the payload only depends on the
/// project's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub project_name: String,
    pub dist_dir_name: String,
    pub files: Vec<FileStat>,
    pub meta: LayoutMeta,
}

/// Project metadata with tag ids resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutMeta {
    pub title: String,
    pub stacks: Vec<TagInfo>,
    pub desc: Vec<TagInfo>,
    pub core: Vec<String>,
}

impl LayoutData {
    /// Derive the payload for `stats`. Unknown tag ids are dropped.
    pub fn build(stats: &ProjectStats, config: &InjectConfig, tags: &TagRegistry) -> Self {
        let meta = &stats.meta;

        Self {
            back_url: config.back_url.clone(),
            base_url: (config.base_url)(stats),
            github_url: config.github_url.clone(),
            source_url: (config.source_url)(stats),
            stats: LayoutStats {
                project_name: stats.project_name.clone(),
                dist_dir_name: stats.dist_dir_name.clone(),
                files: stats.files.clone(),
                meta: LayoutMeta {
                    title: meta.title.clone(),
                    stacks: tags.resolve(&meta.stacks),
                    desc: meta
                        .desc
                        .as_deref()
                        .map(|ids| tags.resolve(ids))
                        .unwrap_or_default(),
                    core: meta.core.clone().unwrap_or_default(),
                },
            },
        }
    }
}
