//! Clip registry: retargeted clips that outlive any scene graph.
//!
//! Entries are owned by the registry (copied in at `put`), never borrowed from
//! a scene graph, so discarding the source graph and loading the target graph
//! leaves every entry intact.

use indexmap::IndexMap;

use crate::remap::RetargetedClip;

/// Insertion-ordered store of retargeted clips keyed by output name.
#[derive(Default, Debug, Clone)]
pub struct ClipRegistry {
    clips: IndexMap<String, RetargetedClip>,
}

impl ClipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a clip. A clip with an existing name replaces that entry and
    /// keeps its position. Returns the replaced clip, if any.
    pub fn put(&mut self, clip: RetargetedClip) -> Option<RetargetedClip> {
        self.clips.insert(clip.name().to_string(), clip)
    }

    /// All clips in insertion order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &RetargetedClip> {
        self.clips.values()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RetargetedClip> {
        self.clips.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }
}
