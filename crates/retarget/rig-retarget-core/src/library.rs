//! Animation library assembly: ordered, named clip segments bound to one skeleton.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::Clip;
use crate::ids::ObjectId;
use crate::remap::RetargetedClip;
use crate::scene::TimelineSegment;

/// The skeleton a library belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonBinding {
    pub id: ObjectId,
    pub name: String,
}

/// One clip placed in the library.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Segment name; equal to the clip name.
    pub name: String,
    pub clip: Clip,
    /// The clip's own first keyframe time. Segments keep native frame
    /// numbering, so start values of different entries may coincide.
    pub start: f32,
    pub length: f32,
}

impl LibraryEntry {
    pub fn segment(&self) -> TimelineSegment {
        TimelineSegment {
            name: self.name.clone(),
            clip: self.clip.name.clone(),
            start: self.start,
            length: self.length,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationLibrary {
    skeleton: SkeletonBinding,
    entries: Vec<LibraryEntry>,
    default_clip: Option<String>,
}

impl AnimationLibrary {
    pub fn skeleton(&self) -> &SkeletonBinding {
        &self.skeleton
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Name of the clip that becomes the skeleton's active clip on export.
    pub fn default_clip(&self) -> Option<&str> {
        self.default_clip.as_deref()
    }

    /// Segments in library order.
    pub fn segments(&self) -> impl Iterator<Item = TimelineSegment> + '_ {
        self.entries.iter().map(LibraryEntry::segment)
    }

    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.entries.iter().map(|e| &e.clip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the library for `skeleton` from clips in the given order.
///
/// The first clip becomes the default. An empty input yields an empty library
/// without a default. A clip whose name is already present is skipped.
pub fn assemble<'a, I>(skeleton: SkeletonBinding, clips: I) -> AnimationLibrary
where
    I: IntoIterator<Item = &'a RetargetedClip>,
{
    let mut entries: Vec<LibraryEntry> = Vec::new();
    for retargeted in clips {
        let clip = &retargeted.clip;
        if entries.iter().any(|e| e.name == clip.name) {
            warn!(
                "library '{}': duplicate clip '{}' skipped",
                skeleton.name, clip.name
            );
            continue;
        }
        let (start, end) = clip.frame_range();
        entries.push(LibraryEntry {
            name: clip.name.clone(),
            clip: clip.clone(),
            start,
            length: end - start,
        });
    }
    let default_clip = entries.first().map(|e| e.name.clone());
    AnimationLibrary {
        skeleton,
        entries,
        default_clip,
    }
}
