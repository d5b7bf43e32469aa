use std::path::PathBuf;
use thiserror::Error;

/// Core library errors
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shared asset not found: {0}")]
    SharedAssetMissing(PathBuf),

    #[error("Projects directory not found: {0}")]
    ProjectsDirNotFound(PathBuf),

    #[error("Refusing to reset output directory '{output}': it would delete '{protected}'")]
    UnsafeOutputDir { output: PathBuf, protected: PathBuf },

    #[error("Failed to serialize layout data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl AssembleError {
    /// Wrap an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AssembleError>;
