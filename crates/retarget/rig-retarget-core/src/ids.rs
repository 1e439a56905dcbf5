//! Identifiers and simple allocators for scene objects.

use serde::{Deserialize, Serialize};

/// Identity of one object inside a loaded [`SceneGraph`](crate::scene::SceneGraph).
///
/// Ids are only meaningful for the scene graph that allocated them; a discarded
/// graph's ids must not be used against a later load.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Monotonic allocator for ObjectId.
/// Dense indices keep ids stable across object removal; ids are never reused.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_object: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
