//! Channel remapping: rewrite bone references of a clip through a bone map.
//!
//! The remapper is a pure transformation. It never touches a scene graph and
//! always returns a fresh clip, so mutating the result (or storing it in a
//! registry) cannot perturb the clip that was loaded.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bone_map::BoneNameMap;
use crate::bone_path;
use crate::config::UnmappedChannelPolicy;
use crate::data::{Channel, Clip};

/// A clip renamed through the clip table whose channels now reference
/// target-rig bones where the bone map had an entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RetargetedClip {
    /// Name of the clip this one was produced from.
    pub source_name: String,
    pub clip: Clip,
}

impl RetargetedClip {
    pub fn name(&self) -> &str {
        &self.clip.name
    }
}

/// Per-clip channel accounting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapStats {
    /// Channels whose bone reference was rewritten.
    pub rewritten: usize,
    /// Channels copied unchanged (unmapped bone, or no bone at all).
    pub passed_through: usize,
    /// Channels removed under [`UnmappedChannelPolicy::Drop`].
    pub dropped: usize,
}

impl RemapStats {
    pub fn merge(&mut self, other: RemapStats) {
        self.rewritten += other.rewritten;
        self.passed_through += other.passed_through;
        self.dropped += other.dropped;
    }
}

/// Rewrites channel bone references using a [`BoneNameMap`].
#[derive(Clone, Copy, Debug)]
pub struct ChannelRemapper<'a> {
    map: &'a BoneNameMap,
    policy: UnmappedChannelPolicy,
}

impl<'a> ChannelRemapper<'a> {
    pub fn new(map: &'a BoneNameMap, policy: UnmappedChannelPolicy) -> Self {
        Self { map, policy }
    }

    /// Rewritten path for the first map pair whose source bone `path`
    /// references, or `None` when no pair matches.
    pub fn remap_path(&self, path: &str) -> Option<String> {
        self.map
            .iter()
            .find_map(|(source, target)| bone_path::rename_bone(path, source, target))
    }

    /// Remap `clip` into an independent copy named `new_name`.
    pub fn remap(&self, clip: &Clip, new_name: &str) -> RetargetedClip {
        self.remap_with_stats(clip, new_name).0
    }

    pub fn remap_with_stats(&self, clip: &Clip, new_name: &str) -> (RetargetedClip, RemapStats) {
        let mut stats = RemapStats::default();
        let mut channels: Vec<Channel> = Vec::with_capacity(clip.channels.len());

        for channel in &clip.channels {
            if let Some(path) = self.remap_path(&channel.data_path) {
                stats.rewritten += 1;
                channels.push(Channel {
                    data_path: path,
                    array_index: channel.array_index,
                    keys: channel.keys.clone(),
                });
                continue;
            }

            match (channel.bone_id(), self.policy) {
                (Some(bone), UnmappedChannelPolicy::Drop) => {
                    debug!(
                        "remap '{}': dropping channel '{}' (bone '{}' not mapped)",
                        clip.name, channel.data_path, bone
                    );
                    stats.dropped += 1;
                }
                (bone, _) => {
                    if let Some(bone) = bone {
                        debug!(
                            "remap '{}': bone '{}' not mapped; passing '{}' through",
                            clip.name, bone, channel.data_path
                        );
                    }
                    stats.passed_through += 1;
                    channels.push(channel.clone());
                }
            }
        }

        let retargeted = RetargetedClip {
            source_name: clip.name.clone(),
            clip: Clip::new(new_name, channels),
        };
        (retargeted, stats)
    }
}

/// Remap with the default pass-through policy.
pub fn remap(clip: &Clip, map: &BoneNameMap, new_name: &str) -> RetargetedClip {
    ChannelRemapper::new(map, UnmappedChannelPolicy::PassThrough).remap(clip, new_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Interpolation, Keyframe};

    fn channel(path: &str) -> Channel {
        Channel::new(
            path,
            0,
            vec![Keyframe {
                time: 1.0,
                value: 0.5,
                interpolation: Interpolation::Linear,
            }],
        )
    }

    #[test]
    fn later_insert_replaces_earlier_target() {
        let map: BoneNameMap = [("pelvis", "Hips"), ("pelvis", "Root"), ("spine_01", "Spine")]
            .into_iter()
            .collect();
        let remapper = ChannelRemapper::new(&map, UnmappedChannelPolicy::PassThrough);
        assert_eq!(
            remapper.remap_path("pose.bones[\"pelvis\"].location").as_deref(),
            Some("pose.bones[\"Root\"].location")
        );
        assert_eq!(
            remapper.remap_path("pose.bones[\"spine_01\"].scale").as_deref(),
            Some("pose.bones[\"Spine\"].scale")
        );
    }

    #[test]
    fn map_order_decides_between_overlapping_pairs() {
        // A path naming two mapped bones is rewritten by the earlier pair only.
        let map: BoneNameMap = [("b", "B"), ("a", "A")].into_iter().collect();
        let remapper = ChannelRemapper::new(&map, UnmappedChannelPolicy::PassThrough);
        let out = remapper.remap_path("pose.bones[\"a\"].target.pose.bones[\"b\"]");
        assert_eq!(
            out.as_deref(),
            Some("pose.bones[\"a\"].target.pose.bones[\"B\"]")
        );
    }

    #[test]
    fn repeated_reference_is_rewritten_everywhere() {
        let map: BoneNameMap = [("a", "A")].into_iter().collect();
        let remapper = ChannelRemapper::new(&map, UnmappedChannelPolicy::PassThrough);
        let out = remapper.remap_path("pose.bones[\"a\"].target.pose.bones[\"a\"]");
        assert_eq!(
            out.as_deref(),
            Some("pose.bones[\"A\"].target.pose.bones[\"A\"]")
        );
    }

    #[test]
    fn drop_policy_keeps_object_level_channels() {
        let map: BoneNameMap = [("pelvis", "Hips")].into_iter().collect();
        let clip = Clip::new(
            "Jump_Armature",
            vec![
                channel("pose.bones[\"pelvis\"].location"),
                channel("pose.bones[\"spine_04\"].rotation_quaternion"),
                channel("location"),
            ],
        );
        let (out, stats) = ChannelRemapper::new(&map, UnmappedChannelPolicy::Drop)
            .remap_with_stats(&clip, "Jump");
        let paths: Vec<_> = out.clip.channels.iter().map(|c| c.data_path.as_str()).collect();
        assert_eq!(paths, vec!["pose.bones[\"Hips\"].location", "location"]);
        assert_eq!(
            stats,
            RemapStats {
                rewritten: 1,
                passed_through: 1,
                dropped: 1
            }
        );
    }

    #[test]
    fn output_is_independent_of_source() {
        let map: BoneNameMap = [("pelvis", "Hips")].into_iter().collect();
        let clip = Clip::new("Idle", vec![channel("pose.bones[\"pelvis\"].location")]);
        let mut out = remap(&clip, &map, "Idle_Loop");
        out.clip.channels[0].keys[0].value = 9.0;
        assert_eq!(clip.channels[0].keys[0].value, 0.5);
        assert_eq!(out.source_name, "Idle");
        assert_eq!(out.name(), "Idle_Loop");
    }
}
