//! Batch conversion of a directory tree of scene files.
//!
//! Walks an input tree, converts every matching file with a [`SceneConverter`]
//! and mirrors the relative layout under an output directory. One file failing
//! does not stop the batch.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use rig_retarget::{ObjectKind, SceneGraph, StoredBundle};

use crate::bundle_io::JsonBundleIo;
use crate::error::ConvertError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConvertConfig {
    /// Input extensions, without the dot. Compared case-insensitively.
    pub extensions: Vec<String>,
    /// Files whose path below the input root contains this marker (any case)
    /// are skipped, including everything inside a matching directory.
    pub exclude_marker: Option<String>,
    pub output_extension: String,
}

impl Default for BatchConvertConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            exclude_marker: Some("collision".to_string()),
            output_extension: "json".to_string(),
        }
    }
}

impl BatchConvertConfig {
    /// `rel` is the file's path relative to the input root.
    fn accepts(&self, rel: &Path) -> bool {
        let Some(ext) = rel.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }
        match &self.exclude_marker {
            Some(marker) => !rel
                .to_string_lossy()
                .to_ascii_lowercase()
                .contains(&marker.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// One clip found in a converted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipInventory {
    pub name: String,
    /// Whole frames between the first and last key.
    pub frames: u32,
}

/// What a converted file contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInventory {
    pub meshes: usize,
    pub armatures: usize,
    pub clips: Vec<ClipInventory>,
}

impl SceneInventory {
    pub fn of(scene: &SceneGraph) -> Self {
        Self {
            meshes: scene.objects_of_kind(ObjectKind::Mesh).count(),
            armatures: scene.objects_of_kind(ObjectKind::Skeleton).count(),
            clips: scene
                .clips()
                .iter()
                .map(|c| ClipInventory {
                    name: c.name.clone(),
                    frames: c.frame_length() as u32,
                })
                .collect(),
        }
    }

    fn log(&self) {
        info!(
            "      found {} meshes, {} armatures",
            self.meshes, self.armatures
        );
        for clip in &self.clips {
            info!("      animation '{}' ({} frames)", clip.name, clip.frames);
        }
    }
}

/// Converts one scene file into one output file and reports its content.
pub trait SceneConverter {
    fn convert(&mut self, input: &Path, output: &Path) -> Result<SceneInventory, ConvertError>;
}

/// Rewrites JSON scene bundles in normalized form: validated, pretty-printed,
/// optional fields omitted.
#[derive(Debug, Default, Clone)]
pub struct JsonBundleConverter {
    io: JsonBundleIo,
}

impl JsonBundleConverter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneConverter for JsonBundleConverter {
    fn convert(&mut self, input: &Path, output: &Path) -> Result<SceneInventory, ConvertError> {
        let stored = self.io.read_stored(input)?;
        let scene = stored.into_scene().map_err(|reason| ConvertError::Decode {
            path: input.to_path_buf(),
            reason,
        })?;
        let inventory = SceneInventory::of(&scene);
        let normalized = StoredBundle::from_scene(&scene);
        scene.discard();
        self.io.write_stored(&normalized, output)?;
        Ok(inventory)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output size in bytes on success.
    pub bytes: Option<u64>,
    pub inventory: Option<SceneInventory>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub converted: usize,
    pub failed: usize,
    pub entries: Vec<ConversionEntry>,
}

impl ConversionReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    fn record_failure(&mut self, input: PathBuf, output: PathBuf, error: String) {
        self.failed += 1;
        self.entries.push(ConversionEntry {
            input,
            output,
            bytes: None,
            inventory: None,
            error: Some(error),
        });
    }
}

/// Accepted files under `root` (sorted) and the errors met while walking it.
fn walk(root: &Path, cfg: &BatchConvertConfig) -> (Vec<PathBuf>, Vec<walkdir::Error>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(e) if e.file_type().is_file() => {
                let path = e.into_path();
                let rel = path.strip_prefix(root).unwrap_or(&path);
                if cfg.accepts(rel) {
                    files.push(path);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), e);
                errors.push(e);
            }
        }
    }
    files.sort();
    (files, errors)
}

/// All convertible files under `root`, sorted by path. Entries that cannot be
/// read are logged and left out.
pub fn discover_scene_files(root: &Path, cfg: &BatchConvertConfig) -> Vec<PathBuf> {
    walk(root, cfg).0
}

fn mirrored_output(input_root: &Path, output_root: &Path, file: &Path, ext: &str) -> PathBuf {
    let rel = file.strip_prefix(input_root).unwrap_or(file);
    output_root.join(rel).with_extension(ext)
}

/// Convert every file [`discover_scene_files`] finds under `input`.
///
/// Walk errors (an unreadable subtree, a missing input root) count as failed
/// entries, so such a batch never reports success.
pub fn convert_tree<C: SceneConverter + ?Sized>(
    input: &Path,
    output: &Path,
    cfg: &BatchConvertConfig,
    converter: &mut C,
) -> ConversionReport {
    let mut report = ConversionReport::default();
    let (files, walk_errors) = walk(input, cfg);
    for err in walk_errors {
        let path = err.path().unwrap_or(input).to_path_buf();
        error!("ERROR {}: {}", path.display(), err);
        report.record_failure(path, output.to_path_buf(), err.to_string());
    }

    for file in files {
        let out = mirrored_output(input, output, &file, &cfg.output_extension);
        let result = out
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(|source| ConvertError::Write {
                path: out.clone(),
                source,
            })
            .and_then(|()| converter.convert(&file, &out));

        match result {
            Ok(inventory) => {
                let bytes = fs::metadata(&out).map(|m| m.len()).ok();
                info!(
                    "OK    {} -> {} ({} KB)",
                    file.display(),
                    out.display(),
                    bytes.unwrap_or(0).div_ceil(1024)
                );
                inventory.log();
                report.converted += 1;
                report.entries.push(ConversionEntry {
                    input: file,
                    output: out,
                    bytes,
                    inventory: Some(inventory),
                    error: None,
                });
            }
            Err(e) => {
                error!("ERROR {}: {}", file.display(), e);
                report.record_failure(file, out, e.to_string());
            }
        }
    }
    info!(
        "converted {} file(s), {} failed",
        report.converted, report.failed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_honours_extension_and_marker() {
        let cfg = BatchConvertConfig::default();
        assert!(cfg.accepts(Path::new("a/Hero.JSON")));
        assert!(!cfg.accepts(Path::new("a/hero.fbx")));
        assert!(!cfg.accepts(Path::new("a/Hero_Collision.json")));
        assert!(!cfg.accepts(Path::new("Collision/hero.json")));
        assert!(!cfg.accepts(Path::new("a/noext")));

        let keep_all = BatchConvertConfig {
            exclude_marker: None,
            ..BatchConvertConfig::default()
        };
        assert!(keep_all.accepts(Path::new("a/Hero_Collision.json")));
    }

    #[test]
    fn output_mirrors_relative_layout() {
        let out = mirrored_output(
            Path::new("/in"),
            Path::new("/out"),
            Path::new("/in/chars/hero.fbx"),
            "json",
        );
        assert_eq!(out, PathBuf::from("/out/chars/hero.json"));
    }
}
