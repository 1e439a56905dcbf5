//! Export artifact: the exact content of one written variant bundle.

use thiserror::Error;

use crate::library::AnimationLibrary;
use crate::scene::{Mesh, ObjectKind, SceneGraph, SceneObject, Skeleton};

/// The export selection does not describe exactly one skeleton and one mesh.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("export selection holds {0} skeletons, expected exactly one")]
    SkeletonCount(usize),
    #[error("export selection holds {0} visible meshes, expected exactly one")]
    MeshCount(usize),
}

/// Skeleton, one mesh variant and the clip library, borrowed from the scene.
///
/// Built from the scene's current selection, so an artifact can only ever
/// carry the one mesh the exporter isolated.
#[derive(Debug, Clone, Copy)]
pub struct ExportArtifact<'a> {
    pub skeleton: &'a SceneObject,
    pub mesh: &'a SceneObject,
    pub library: &'a AnimationLibrary,
}

impl<'a> ExportArtifact<'a> {
    /// Collect the selected skeleton and the selected, visible mesh.
    pub fn from_selection(
        scene: &'a SceneGraph,
        library: &'a AnimationLibrary,
    ) -> Result<Self, SelectionError> {
        let skeletons: Vec<&SceneObject> = scene
            .objects_of_kind(ObjectKind::Skeleton)
            .filter(|o| o.selected)
            .collect();
        let meshes: Vec<&SceneObject> = scene
            .objects_of_kind(ObjectKind::Mesh)
            .filter(|o| o.selected && o.visible)
            .collect();

        match (skeletons.as_slice(), meshes.as_slice()) {
            (&[skeleton], &[mesh]) => Ok(Self {
                skeleton,
                mesh,
                library,
            }),
            ([_], meshes) => Err(SelectionError::MeshCount(meshes.len())),
            (skeletons, _) => Err(SelectionError::SkeletonCount(skeletons.len())),
        }
    }

    pub fn skeleton_data(&self) -> Option<&'a Skeleton> {
        self.skeleton.as_skeleton()
    }

    pub fn mesh_data(&self) -> Option<&'a Mesh> {
        self.mesh.as_mesh()
    }
}
