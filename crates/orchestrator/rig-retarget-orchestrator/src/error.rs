use std::path::PathBuf;

use thiserror::Error;

use rig_retarget::{BundleError, ConfigError, SelectionError};

/// Fatal pipeline failure; the run stops in the `Failed` state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("source bundle could not be loaded: {0}")]
    SourceLoad(#[source] BundleError),

    #[error("target bundle could not be loaded: {0}")]
    TargetLoad(#[source] BundleError),

    #[error("target bundle {path} has no skeleton")]
    NoSkeleton { path: PathBuf },
}

/// Failure exporting a single variant. Recorded, never fatal to the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("variant object is missing from the scene")]
    MissingVariant,

    #[error("skeleton object is missing from the scene")]
    MissingSkeleton,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Write(#[from] BundleError),
}

/// Failure converting one file in a batch conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Bundle(#[from] BundleError),
}
