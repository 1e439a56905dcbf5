//! Retarget run configuration.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::bone_map::BoneNameMap;
use crate::error::ConfigError;
use crate::selection::ClipSelectionTable;

/// What to do with a channel whose bone has no entry in the bone map.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedChannelPolicy {
    /// Keep the channel with its original (possibly dangling) bone reference.
    #[default]
    PassThrough,
    /// Remove channels that reference a bone absent from the map.
    /// Channels without any bone reference are always kept.
    Drop,
}

/// One wanted mesh variant in the target bundle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantSpec {
    /// Human-facing tag, e.g. "Male".
    pub tag: String,
    /// A mesh whose object name contains this string is this variant.
    pub name_contains: String,
    /// Where the variant's artifact is written.
    pub output: PathBuf,
}

impl VariantSpec {
    pub fn matches(&self, object_name: &str) -> bool {
        object_name.contains(&self.name_contains)
    }
}

/// Flags handed to the bundle writer for every variant export.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportOptions {
    pub include_animation: bool,
    pub include_skins: bool,
    pub include_morph_targets: bool,
    pub include_lights: bool,
    pub include_cameras: bool,
    /// Must stay off: modifiers are written as declared.
    pub apply_modifiers: bool,
    /// Must stay off: every clip is written as its own segment.
    pub merge_segments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_animation: true,
            include_skins: true,
            include_morph_targets: true,
            include_lights: false,
            include_cameras: false,
            apply_modifiers: false,
            merge_segments: false,
        }
    }
}

impl ExportOptions {
    /// Reject flags the bundle writer cannot honor. Lights and cameras are
    /// never part of an artifact; modifiers and segments are written as is.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unsupported = [
            ("include_lights", self.include_lights),
            ("include_cameras", self.include_cameras),
            ("apply_modifiers", self.apply_modifiers),
            ("merge_segments", self.merge_segments),
        ];
        match unsupported.into_iter().find(|(_, on)| *on) {
            Some((option, _)) => Err(ConfigError::UnsupportedExportOption { option }),
            None => Ok(()),
        }
    }
}

/// Static inputs of one retarget run.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetargetConfig {
    pub bone_map: BoneNameMap,
    pub clips: ClipSelectionTable,
    /// Wanted variants in export order.
    pub variants: Vec<VariantSpec>,
    pub unmapped_channels: UnmappedChannelPolicy,
    pub export: ExportOptions,
}

impl RetargetConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: RetargetConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bone_map.validate()?;
        self.clips.validate()?;
        self.export.validate()?;
        if self.variants.is_empty() {
            return Err(ConfigError::NoVariants);
        }
        let mut tags = HashSet::with_capacity(self.variants.len());
        for variant in &self.variants {
            if variant.name_contains.is_empty() {
                return Err(ConfigError::EmptyVariantFilter {
                    tag: variant.tag.clone(),
                });
            }
            if !tags.insert(variant.tag.as_str()) {
                return Err(ConfigError::DuplicateVariantTag {
                    tag: variant.tag.clone(),
                });
            }
        }
        Ok(())
    }
}
