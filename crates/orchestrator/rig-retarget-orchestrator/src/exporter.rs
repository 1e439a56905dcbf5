//! Variant export: isolate one mesh variant, stage the library on the
//! skeleton, hand the selection to the bundle writer, then restore the scene's
//! visibility and selection exactly as they were.

use std::path::Path;

use log::debug;

use rig_retarget::{
    AnimationLibrary, ExportArtifact, ExportOptions, ObjectId, SceneGraph, SkeletonBinding,
};

use crate::bundle_io::BundleIo;
use crate::error::ExportError;
use crate::resolve::MeshVariant;

/// Visibility and selection of every object, captured before an export.
struct SelectionSnapshot {
    states: Vec<(ObjectId, bool, bool)>,
}

impl SelectionSnapshot {
    fn capture(scene: &SceneGraph) -> Self {
        Self {
            states: scene
                .objects()
                .iter()
                .map(|o| (o.id, o.visible, o.selected))
                .collect(),
        }
    }

    fn restore(self, scene: &mut SceneGraph) {
        for (id, visible, selected) in self.states {
            if let Some(obj) = scene.object_mut(id) {
                obj.visible = visible;
                obj.selected = selected;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VariantExporter<'a> {
    options: &'a ExportOptions,
}

impl<'a> VariantExporter<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        Self { options }
    }

    /// Write one artifact holding `skeleton`, `variant` and `library`, and
    /// return its size in bytes.
    ///
    /// Siblings are hidden and deselected only for the duration of the call;
    /// prior visibility and selection of every object are restored before
    /// returning, whether the write succeeded or not. The skeleton keeps the
    /// staged active clip and segments afterwards; each call starts from a
    /// cleared segment set.
    pub fn export_variant<IO: BundleIo + ?Sized>(
        &self,
        io: &mut IO,
        scene: &mut SceneGraph,
        skeleton: &SkeletonBinding,
        variant: &MeshVariant,
        library: &AnimationLibrary,
        siblings: &[MeshVariant],
        target: &Path,
    ) -> Result<u64, ExportError> {
        if scene.object(variant.object).is_none() {
            return Err(ExportError::MissingVariant);
        }
        if scene.skeleton(skeleton.id).is_none() {
            return Err(ExportError::MissingSkeleton);
        }

        let snapshot = SelectionSnapshot::capture(scene);
        isolate(scene, skeleton.id, variant.object, siblings);
        stage_library(scene, skeleton.id, library);

        debug!(
            "export '{}': {} segments, default {:?} -> {}",
            variant.tag,
            library.len(),
            library.default_clip(),
            target.display()
        );
        let result = ExportArtifact::from_selection(scene, library)
            .map_err(ExportError::from)
            .and_then(|artifact| {
                io.write(&artifact, self.options, target)
                    .map_err(ExportError::from)
            });

        snapshot.restore(scene);
        result
    }
}

/// Select exactly the skeleton and the variant; hide every sibling.
fn isolate(scene: &mut SceneGraph, skeleton: ObjectId, variant: ObjectId, siblings: &[MeshVariant]) {
    for obj in scene.objects_mut() {
        obj.selected = false;
        if siblings.iter().any(|s| s.object == obj.id) {
            obj.visible = false;
        }
    }
    for id in [skeleton, variant] {
        if let Some(obj) = scene.object_mut(id) {
            obj.visible = true;
            obj.selected = true;
        }
    }
}

/// Make the library's default clip active and lay out one fresh segment per entry.
fn stage_library(scene: &mut SceneGraph, skeleton: ObjectId, library: &AnimationLibrary) {
    if let Some(skel) = scene.skeleton_mut(skeleton) {
        skel.animation.active_clip = library.default_clip().map(str::to_string);
        skel.animation.segments.clear();
        skel.animation.segments.extend(library.segments());
    }
}
