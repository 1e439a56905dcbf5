//! In-memory scene graph produced by loading a bundle.
//!
//! A `SceneGraph` is a plain value: `load` returns it, pipeline steps borrow it
//! explicitly, and [`SceneGraph::discard`] consumes it. Every object is
//! classified once into an [`ObjectRole`] when the bundle is read, so call
//! sites match on the role instead of re-inspecting a type string.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::Clip;
use crate::ids::{IdAllocator, ObjectId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
}

/// Placement of one clip on a skeleton's animation timeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimelineSegment {
    pub name: String,
    pub clip: String,
    /// Start frame (the clip's own first keyframe time).
    pub start: f32,
    /// Length in frames.
    pub length: f32,
}

/// Export-time animation state carried by a skeleton.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SkeletonAnimation {
    pub active_clip: Option<String>,
    pub segments: Vec<TimelineSegment>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub animation: SkeletonAnimation,
}

impl Skeleton {
    pub fn has_bone(&self, name: &str) -> bool {
        self.bones.iter().any(|b| b.name == name)
    }
}

/// Per-vertex weighting of a mesh to a skeleton's bones.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkinBinding {
    /// Name of the skeleton object the mesh is bound to.
    pub skeleton: String,
    /// Bone names the vertex groups refer to.
    pub joints: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Mesh {
    /// Vertex data, preserved verbatim (never interpreted by the pipeline).
    #[serde(default)]
    pub geometry: serde_json::Value,
    #[serde(default)]
    pub skin: Option<SkinBinding>,
    #[serde(default)]
    pub morph_targets: Vec<String>,
    /// Modifier stack, kept unapplied.
    #[serde(default)]
    pub modifiers: Vec<String>,
}

/// Classification of a scene object, decided once at load time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Skeleton,
    Mesh,
    Light,
    Camera,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectRole {
    Skeleton(Skeleton),
    Mesh(Mesh),
    Light(serde_json::Value),
    Camera(serde_json::Value),
    /// Anything else; `kind` is the type string found in the bundle.
    Other {
        kind: String,
        data: serde_json::Value,
    },
}

impl ObjectRole {
    #[inline]
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectRole::Skeleton(_) => ObjectKind::Skeleton,
            ObjectRole::Mesh(_) => ObjectKind::Mesh,
            ObjectRole::Light(_) => ObjectKind::Light,
            ObjectRole::Camera(_) => ObjectKind::Camera,
            ObjectRole::Other { .. } => ObjectKind::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub role: ObjectRole,
    pub visible: bool,
    pub selected: bool,
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        self.role.kind()
    }

    pub fn as_skeleton(&self) -> Option<&Skeleton> {
        match &self.role {
            ObjectRole::Skeleton(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_skeleton_mut(&mut self) -> Option<&mut Skeleton> {
        match &mut self.role {
            ObjectRole::Skeleton(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.role {
            ObjectRole::Mesh(m) => Some(m),
            _ => None,
        }
    }
}

/// Objects and clips of one loaded bundle.
#[derive(Debug, Default)]
pub struct SceneGraph {
    pub name: String,
    ids: IdAllocator,
    objects: Vec<SceneObject>,
    clips: Vec<Clip>,
}

impl SceneGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a visible, unselected object.
    pub fn add_object(&mut self, name: impl Into<String>, role: ObjectRole) -> ObjectId {
        let id = self.ids.alloc_object();
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            role,
            visible: true,
            selected: false,
        });
        id
    }

    pub fn add_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Objects in load order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(move |o| o.kind() == kind)
    }

    /// Remove an object from the graph, returning it.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(idx))
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, name: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn skeleton(&self, id: ObjectId) -> Option<&Skeleton> {
        self.object(id).and_then(SceneObject::as_skeleton)
    }

    pub fn skeleton_mut(&mut self, id: ObjectId) -> Option<&mut Skeleton> {
        self.object_mut(id).and_then(SceneObject::as_skeleton_mut)
    }

    /// Destroy the graph together with its skeletons, meshes and clips.
    pub fn discard(self) {
        debug!(
            "discarding scene '{}' ({} objects, {} clips)",
            self.name,
            self.objects.len(),
            self.clips.len()
        );
    }
}
