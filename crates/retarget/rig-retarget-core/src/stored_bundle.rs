use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::ExportOptions;
use crate::data::Clip;
use crate::export::ExportArtifact;
use crate::scene::{
    Bone, Mesh, ObjectRole, SceneGraph, SceneObject, Skeleton, SkeletonAnimation, SkinBinding,
    TimelineSegment,
};

pub const TYPE_ARMATURE: &str = "ARMATURE";
pub const TYPE_MESH: &str = "MESH";
pub const TYPE_LIGHT: &str = "LIGHT";
pub const TYPE_CAMERA: &str = "CAMERA";

/// Public API: parse a JSON scene bundle (see fixtures/bundles/*.json) into its
/// serde schema. Use [`StoredBundle::into_scene`] to obtain a [`SceneGraph`].
///
/// Notes:
/// - Object `type` strings are classified once, in `into_scene`.
/// - Mesh `geometry` and light/camera `data` are opaque and preserved verbatim.
/// - Keyframe times are frames; clips keep their native frame numbering.
pub fn parse_bundle_json(s: &str) -> Result<StoredBundle, serde_json::Error> {
    serde_json::from_str(s)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredBundle {
    pub name: String,
    /// Present on bundles written by an export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<ExportOptions>,
    #[serde(default)]
    pub objects: Vec<StoredObject>,
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<StoredLibrary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    // Armature
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bones: Vec<Bone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_clip: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<TimelineSegment>,
    // Mesh
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub geometry: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<SkinBinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub morph_targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    // Light / camera / anything else
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub data: JsonValue,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredLibrary {
    pub skeleton: String,
    #[serde(default)]
    pub default_clip: Option<String>,
    pub segments: Vec<TimelineSegment>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl StoredObject {
    fn empty(name: &str, kind: &str, hidden: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            hidden,
            bones: Vec::new(),
            active_clip: None,
            segments: Vec::new(),
            geometry: JsonValue::Null,
            skin: None,
            morph_targets: Vec::new(),
            modifiers: Vec::new(),
            data: JsonValue::Null,
        }
    }

    fn into_role(self) -> ObjectRole {
        match self.kind.as_str() {
            TYPE_ARMATURE => ObjectRole::Skeleton(Skeleton {
                bones: self.bones,
                animation: SkeletonAnimation {
                    active_clip: self.active_clip,
                    segments: self.segments,
                },
            }),
            TYPE_MESH => ObjectRole::Mesh(Mesh {
                geometry: self.geometry,
                skin: self.skin,
                morph_targets: self.morph_targets,
                modifiers: self.modifiers,
            }),
            TYPE_LIGHT => ObjectRole::Light(self.data),
            TYPE_CAMERA => ObjectRole::Camera(self.data),
            _ => ObjectRole::Other {
                kind: self.kind,
                data: self.data,
            },
        }
    }

    fn from_object(obj: &SceneObject) -> Self {
        let hidden = !obj.visible;
        match &obj.role {
            ObjectRole::Skeleton(s) => StoredObject {
                bones: s.bones.clone(),
                active_clip: s.animation.active_clip.clone(),
                segments: s.animation.segments.clone(),
                ..Self::empty(&obj.name, TYPE_ARMATURE, hidden)
            },
            ObjectRole::Mesh(m) => StoredObject {
                geometry: m.geometry.clone(),
                skin: m.skin.clone(),
                morph_targets: m.morph_targets.clone(),
                modifiers: m.modifiers.clone(),
                ..Self::empty(&obj.name, TYPE_MESH, hidden)
            },
            ObjectRole::Light(data) => StoredObject {
                data: data.clone(),
                ..Self::empty(&obj.name, TYPE_LIGHT, hidden)
            },
            ObjectRole::Camera(data) => StoredObject {
                data: data.clone(),
                ..Self::empty(&obj.name, TYPE_CAMERA, hidden)
            },
            ObjectRole::Other { kind, data } => StoredObject {
                data: data.clone(),
                ..Self::empty(&obj.name, kind, hidden)
            },
        }
    }
}

impl StoredBundle {
    /// Validate and classify into a scene graph.
    ///
    /// Rejects duplicate object names, duplicate bone names within an armature,
    /// bone parents that are not declared before the child, and clips with
    /// non-finite or decreasing key times.
    pub fn into_scene(self) -> Result<SceneGraph, String> {
        let mut names: HashSet<String> = HashSet::with_capacity(self.objects.len());
        for obj in &self.objects {
            if !names.insert(obj.name.clone()) {
                return Err(format!("duplicate object name '{}'", obj.name));
            }
            if obj.kind == TYPE_ARMATURE {
                validate_bones(&obj.name, &obj.bones)?;
            }
        }
        for clip in &self.clips {
            clip.validate_basic()?;
        }

        let mut scene = SceneGraph::new(self.name);
        for obj in self.objects {
            let name = obj.name.clone();
            let hidden = obj.hidden;
            let id = scene.add_object(name, obj.into_role());
            if hidden {
                if let Some(o) = scene.object_mut(id) {
                    o.visible = false;
                }
            }
        }
        for clip in self.clips {
            scene.add_clip(clip);
        }
        Ok(scene)
    }

    /// Full snapshot of a scene graph (every object and clip).
    pub fn from_scene(scene: &SceneGraph) -> Self {
        Self {
            name: scene.name.clone(),
            export_settings: None,
            objects: scene.objects().iter().map(StoredObject::from_object).collect(),
            clips: scene.clips().to_vec(),
            library: None,
        }
    }

    /// Bundle content for one exported variant, honoring the include flags.
    ///
    /// Only the artifact's skeleton and mesh are written, so lights, cameras
    /// and sibling meshes never reach the output. Modifiers are written as
    /// declared; segments are always written individually.
    pub fn from_artifact(name: &str, artifact: &ExportArtifact<'_>, options: &ExportOptions) -> Self {
        let mut skeleton = StoredObject::from_object(artifact.skeleton);
        skeleton.hidden = false;
        let mut mesh = StoredObject::from_object(artifact.mesh);
        mesh.hidden = false;

        if !options.include_skins {
            mesh.skin = None;
        }
        if !options.include_morph_targets {
            mesh.morph_targets.clear();
        }

        let (clips, library) = if options.include_animation {
            let lib = artifact.library;
            let clips: Vec<Clip> = lib.clips().cloned().collect();
            let library = StoredLibrary {
                skeleton: artifact.skeleton.name.clone(),
                default_clip: lib.default_clip().map(str::to_string),
                segments: lib.segments().collect(),
            };
            (clips, Some(library))
        } else {
            skeleton.active_clip = None;
            skeleton.segments.clear();
            (Vec::new(), None)
        };

        Self {
            name: name.to_string(),
            export_settings: Some(options.clone()),
            objects: vec![skeleton, mesh],
            clips,
            library,
        }
    }
}

fn validate_bones(armature: &str, bones: &[Bone]) -> Result<(), String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(bones.len());
    for bone in bones {
        if let Some(parent) = bone.parent.as_deref() {
            if !seen.contains(parent) {
                return Err(format!(
                    "armature '{armature}': bone '{}' has parent '{parent}' that is not declared before it",
                    bone.name
                ));
            }
        }
        if !seen.insert(bone.name.as_str()) {
            return Err(format!(
                "armature '{armature}': duplicate bone '{}'",
                bone.name
            ));
        }
    }
    Ok(())
}
