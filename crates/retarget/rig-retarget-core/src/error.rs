//! Error types for configuration and scene bundle handling.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid retarget configuration. Always fatal: nothing is loaded or written
/// while the configuration is rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("bone map entry {index} has an empty bone identifier")]
    EmptyBoneId { index: usize },

    #[error("clip table entry {index} has an empty clip name")]
    EmptyClipName { index: usize },

    #[error("clip table maps both '{first}' and '{second}' to output name '{output}'")]
    DuplicateOutputName {
        output: String,
        first: String,
        second: String,
    },

    #[error("variant tag '{tag}' is declared more than once")]
    DuplicateVariantTag { tag: String },

    #[error("variant '{tag}' has an empty name filter")]
    EmptyVariantFilter { tag: String },

    #[error("no mesh variants configured")]
    NoVariants,

    #[error("export option '{option}' is not supported by the bundle writer")]
    UnsupportedExportOption { option: &'static str },

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure to load or write a scene bundle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BundleError {
    #[error("failed to read bundle {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bundle {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid bundle {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("failed to write bundle {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize bundle {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
