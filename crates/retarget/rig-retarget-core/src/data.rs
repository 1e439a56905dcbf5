//! Canonical clip data model (channels, keyframes, clips).

use serde::{Deserialize, Serialize};

use crate::bone_path;

/// Keyframe interpolation towards the next key.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Constant,
    #[default]
    Linear,
    Bezier,
}

/// A single key on a scalar curve. `time` is expressed in frames.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// One animated component of one property, e.g. `pose.bones["pelvis"].location[1]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    /// Property path. Bone channels embed the bone as `pose.bones["<id>"]`.
    pub data_path: String,
    /// Component index of the animated property (x/y/z/w).
    #[serde(default)]
    pub array_index: u32,
    pub keys: Vec<Keyframe>,
}

impl Channel {
    pub fn new(data_path: impl Into<String>, array_index: u32, keys: Vec<Keyframe>) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            keys,
        }
    }

    /// Bone identifier referenced by this channel's path, if any.
    pub fn bone_id(&self) -> Option<&str> {
        bone_path::bone_id(&self.data_path)
    }

    /// (first, last) key time, or `None` for a curve without keys.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        let mut keys = self.keys.iter().map(|k| k.time);
        let first = keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

/// A named, ordered collection of channels.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl Clip {
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }

    /// Frame range derived from the keyframes of every channel.
    /// A clip without keys reports `(0.0, 0.0)`.
    pub fn frame_range(&self) -> (f32, f32) {
        self.channels
            .iter()
            .filter_map(Channel::time_range)
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
            .unwrap_or((0.0, 0.0))
    }

    /// Length in frames (`end - start`).
    pub fn frame_length(&self) -> f32 {
        let (start, end) = self.frame_range();
        end - start
    }

    /// Validate basic invariants (finite key times, non-decreasing per channel).
    pub fn validate_basic(&self) -> Result<(), String> {
        for channel in &self.channels {
            let mut last = f32::NEG_INFINITY;
            for key in &channel.keys {
                if !key.time.is_finite() {
                    return Err(format!(
                        "clip '{}': keyframe time must be finite for '{}'",
                        self.name, channel.data_path
                    ));
                }
                if key.time < last {
                    return Err(format!(
                        "clip '{}': keyframe times must be non-decreasing for '{}'",
                        self.name, channel.data_path
                    ));
                }
                last = key.time;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(time: f32) -> Keyframe {
        Keyframe {
            time,
            value: 0.0,
            interpolation: Interpolation::Linear,
        }
    }

    #[test]
    fn frame_range_spans_all_channels() {
        let clip = Clip::new(
            "Walk",
            vec![
                Channel::new("pose.bones[\"a\"].location", 0, vec![key(5.0), key(20.0)]),
                Channel::new("pose.bones[\"b\"].location", 0, vec![key(1.0), key(12.0)]),
                Channel::new("pose.bones[\"c\"].location", 0, vec![]),
            ],
        );
        assert_eq!(clip.frame_range(), (1.0, 20.0));
        assert_eq!(clip.frame_length(), 19.0);
    }

    #[test]
    fn empty_clip_has_zero_range() {
        let clip = Clip::new("Empty", vec![]);
        assert_eq!(clip.frame_range(), (0.0, 0.0));
        assert_eq!(clip.frame_length(), 0.0);
    }

    #[test]
    fn validate_rejects_decreasing_keys() {
        let clip = Clip::new(
            "Bad",
            vec![Channel::new("location", 0, vec![key(3.0), key(2.0)])],
        );
        assert!(clip.validate_basic().is_err());
    }
}
