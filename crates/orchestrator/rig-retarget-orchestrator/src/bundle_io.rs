//! Bundle load/write boundary.
//!
//! The pipeline never touches files directly; it goes through [`BundleIo`].
//! [`JsonBundleIo`] reads and writes the JSON scene bundle on disk and
//! [`MemoryBundleIo`] keeps bundles in memory for tests and embedding hosts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use log::debug;

use rig_retarget::{
    parse_bundle_json, BundleError, ExportArtifact, ExportOptions, SceneGraph, StoredBundle,
};

/// Host operations the pipeline needs: load a bundle into a scene graph, and
/// write an export artifact with the requested options.
pub trait BundleIo {
    fn load(&mut self, path: &Path) -> Result<SceneGraph, BundleError>;

    /// Write `artifact` to `path`, returning the size of the written bundle
    /// in bytes.
    fn write(
        &mut self,
        artifact: &ExportArtifact<'_>,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<u64, BundleError>;
}

/// Name recorded in a written bundle: the output file stem.
fn bundle_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn encode(bundle: &StoredBundle, pretty: bool, path: &Path) -> Result<String, BundleError> {
    if pretty {
        serde_json::to_string_pretty(bundle)
    } else {
        serde_json::to_string(bundle)
    }
    .map_err(|source| BundleError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}

fn into_scene(path: &Path, stored: StoredBundle) -> Result<SceneGraph, BundleError> {
    stored.into_scene().map_err(|reason| BundleError::Invalid {
        path: path.to_path_buf(),
        reason,
    })
}

/// JSON scene bundles on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonBundleIo {
    /// Pretty-print written bundles.
    pub pretty: bool,
    /// Create missing parent directories of output paths.
    pub create_dirs: bool,
}

impl Default for JsonBundleIo {
    fn default() -> Self {
        Self {
            pretty: true,
            create_dirs: true,
        }
    }
}

impl JsonBundleIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_stored(&self, path: &Path) -> Result<StoredBundle, BundleError> {
        let text = fs::read_to_string(path).map_err(|source| BundleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_bundle_json(&text).map_err(|source| BundleError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write `bundle` as JSON, returning the number of bytes written.
    pub fn write_stored(&self, bundle: &StoredBundle, path: &Path) -> Result<u64, BundleError> {
        let text = encode(bundle, self.pretty, path)?;

        if self.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| BundleError::Write {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, &text).map_err(|source| BundleError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("wrote bundle {} ({} bytes)", path.display(), text.len());
        Ok(text.len() as u64)
    }
}

impl BundleIo for JsonBundleIo {
    fn load(&mut self, path: &Path) -> Result<SceneGraph, BundleError> {
        let stored = self.read_stored(path)?;
        into_scene(path, stored)
    }

    fn write(
        &mut self,
        artifact: &ExportArtifact<'_>,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<u64, BundleError> {
        let bundle = StoredBundle::from_artifact(&bundle_name(path), artifact, options);
        self.write_stored(&bundle, path)
    }
}

/// In-memory bundle store keyed by path. Reported write sizes are those of
/// the pretty-printed JSON encoding.
#[derive(Debug, Default)]
pub struct MemoryBundleIo {
    inputs: BTreeMap<PathBuf, StoredBundle>,
    written: BTreeMap<PathBuf, StoredBundle>,
    failing: HashSet<PathBuf>,
    loads: Vec<PathBuf>,
}

impl MemoryBundleIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bundle` loadable from `path`.
    pub fn with_bundle(mut self, path: impl Into<PathBuf>, bundle: StoredBundle) -> Self {
        self.inputs.insert(path.into(), bundle);
        self
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn written(&self, path: &Path) -> Option<&StoredBundle> {
        self.written.get(path)
    }

    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.written.keys().map(PathBuf::as_path)
    }

    /// Paths loaded so far, in call order.
    pub fn loads(&self) -> &[PathBuf] {
        &self.loads
    }
}

impl BundleIo for MemoryBundleIo {
    fn load(&mut self, path: &Path) -> Result<SceneGraph, BundleError> {
        self.loads.push(path.to_path_buf());
        let stored = self.inputs.get(path).cloned().ok_or_else(|| BundleError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such bundle"),
        })?;
        into_scene(path, stored)
    }

    fn write(
        &mut self,
        artifact: &ExportArtifact<'_>,
        options: &ExportOptions,
        path: &Path,
    ) -> Result<u64, BundleError> {
        if self.failing.contains(path) {
            return Err(BundleError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write refused"),
            });
        }
        let bundle = StoredBundle::from_artifact(&bundle_name(path), artifact, options);
        let bytes = encode(&bundle, true, path)?.len() as u64;
        self.written.insert(path.to_path_buf(), bundle);
        Ok(bytes)
    }
}
