use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "demo-assembler.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub discovery: DiscoveryConfig,
    pub stats: StatsConfig,
    pub site: SiteConfig,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory every other relative path resolves against
    pub root: PathBuf,
    /// Parent directory of the sub-projects
    pub projects_dir: PathBuf,
    /// Output root; emptied at the start of every build
    pub output_dir: PathBuf,
    /// Built landing page copied to the output root
    pub landing_dir: PathBuf,
    /// Shared layout stylesheet
    pub stylesheet: PathBuf,
    /// Shared favicon
    pub favicon: PathBuf,
    /// Output subdirectory holding one directory per sub-project
    pub projects_subdir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// File whose presence marks a directory as a sub-project
    pub manifest_file: String,
    /// Build output directory names, in precedence order
    pub output_dir_names: Vec<String>,
    /// Per-project metadata file
    pub meta_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Gzip level used for compressed sizes (0-9)
    pub compression_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// URL path the output root is served under
    pub base_path: String,
    /// Link from a project page back to the landing page. Derived from the
    /// depth of `paths.projects_subdir` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_url: Option<String>,
    /// Repository home page
    pub repository_url: String,
    /// Branch used for per-project source links
    pub source_branch: String,
    /// Appended to every project title
    pub title_suffix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Parallel project jobs (0 = auto)
    pub jobs: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            projects_dir: PathBuf::from("examples"),
            output_dir: PathBuf::from("dist"),
            landing_dir: PathBuf::from("packages/landing/dist"),
            stylesheet: PathBuf::from("scripts/layout/dist/layout.css"),
            favicon: PathBuf::from("scripts/layout/dist/favicon.svg"),
            projects_subdir: "examples".to_string(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            manifest_file: "package.json".to_string(),
            output_dir_names: vec!["dist".to_string(), "build".to_string()],
            meta_file: "meta.json".to_string(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            compression_level: 9,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            back_url: None,
            repository_url: "https://github.com/seognil/todomvc-once-more".to_string(),
            source_branch: "master".to_string(),
            title_suffix: " | TodoMVC Once More".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `demo-assembler.toml` in the
    /// current directory is used when present, otherwise the defaults.
    /// A relative `paths.root` is anchored at the config file's directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
                candidate.is_file().then_some(candidate)
            }
        };

        let Some(path) = path else {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        };

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        let mut config = Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;

        if config.paths.root.is_relative() {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                config.paths.root = dir.join(&config.paths.root);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without validating it.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats.compression_level > 9 {
            return Err(ConfigError::Invalid(format!(
                "stats.compression_level must be 0-9, got {}",
                self.stats.compression_level
            )));
        }
        if self.discovery.output_dir_names.is_empty() {
            return Err(ConfigError::Invalid(
                "discovery.output_dir_names must not be empty".into(),
            ));
        }
        if self.discovery.manifest_file.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "discovery.manifest_file must not be empty".into(),
            ));
        }
        let subdir = Path::new(&self.paths.projects_subdir);
        if subdir.is_absolute()
            || subdir
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(ConfigError::Invalid(format!(
                "paths.projects_subdir must be a relative path inside the output, got '{}'",
                self.paths.projects_subdir
            )));
        }
        Ok(())
    }

    /// Resolve a configured path against `paths.root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.paths.root.join(path)
        }
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.resolve(&self.paths.projects_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output_dir)
    }

    pub fn landing_dir(&self) -> PathBuf {
        self.resolve(&self.paths.landing_dir)
    }

    pub fn stylesheet(&self) -> PathBuf {
        self.resolve(&self.paths.stylesheet)
    }

    pub fn favicon(&self) -> PathBuf {
        self.resolve(&self.paths.favicon)
    }

    /// `paths.projects_subdir` with `.` components dropped.
    pub fn projects_subdir(&self) -> PathBuf {
        Path::new(&self.paths.projects_subdir)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    }
}

/// Lexically clean `path`: drop `.` and fold `..` into its parent.
///
/// The filesystem is not consulted, so symlinks are not resolved.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
