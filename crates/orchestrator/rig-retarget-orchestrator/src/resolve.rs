//! Target resolution: pick the skeleton and the wanted mesh variants.

use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use rig_retarget::{ObjectId, ObjectKind, SceneGraph, SkeletonBinding, VariantSpec};

/// A recognized mesh in the target scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshVariant {
    pub tag: String,
    pub object: ObjectId,
    pub name: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub skeleton: SkeletonBinding,
    /// Variants in configuration order.
    pub variants: Vec<MeshVariant>,
    /// Names of mesh objects removed from the scene.
    pub discarded: Vec<String>,
}

/// Resolve the target skeleton and the mesh variants named by `specs`.
///
/// Returns `None` when the scene has no skeleton. With several skeletons the
/// first one is used. Each variant rule claims the first unclaimed mesh whose name it
/// matches; every other mesh is removed from the scene.
pub fn resolve_target(scene: &mut SceneGraph, specs: &[VariantSpec]) -> Option<ResolvedTarget> {
    let mut skeletons = scene.objects_of_kind(ObjectKind::Skeleton);
    let first = skeletons.next()?;
    let skeleton = SkeletonBinding {
        id: first.id,
        name: first.name.clone(),
    };
    let extra: Vec<&str> = skeletons.map(|o| o.name.as_str()).collect();
    if !extra.is_empty() {
        warn!(
            "scene '{}' has {} skeletons; using '{}', ignoring {:?}",
            scene.name,
            extra.len() + 1,
            skeleton.name,
            extra
        );
    }

    let mut claimed: Vec<Option<(ObjectId, String)>> = vec![None; specs.len()];
    let mut unwanted: Vec<(ObjectId, String)> = Vec::new();
    for mesh in scene.objects_of_kind(ObjectKind::Mesh) {
        let slot = specs
            .iter()
            .enumerate()
            .find(|(i, spec)| claimed[*i].is_none() && spec.matches(&mesh.name))
            .map(|(i, _)| i);
        match slot {
            Some(i) => {
                if let Some(skin) = mesh.as_mesh().and_then(|m| m.skin.as_ref()) {
                    if skin.skeleton != skeleton.name {
                        warn!(
                            "variant '{}' ({}) is skinned to '{}', not '{}'",
                            specs[i].tag, mesh.name, skin.skeleton, skeleton.name
                        );
                    }
                }
                claimed[i] = Some((mesh.id, mesh.name.clone()));
            }
            None => unwanted.push((mesh.id, mesh.name.clone())),
        }
    }

    let mut discarded = Vec::with_capacity(unwanted.len());
    for (id, name) in unwanted {
        warn!("discarding mesh '{}' (not a wanted variant)", name);
        scene.remove_object(id);
        discarded.push(name);
    }

    let mut variants = Vec::with_capacity(specs.len());
    for (spec, slot) in specs.iter().zip(claimed) {
        match slot {
            Some((object, name)) => {
                debug!("variant '{}' -> mesh '{}'", spec.tag, name);
                variants.push(MeshVariant {
                    tag: spec.tag.clone(),
                    object,
                    name,
                    output: spec.output.clone(),
                });
            }
            None => warn!(
                "no mesh matches variant '{}' (name contains '{}')",
                spec.tag, spec.name_contains
            ),
        }
    }

    Some(ResolvedTarget {
        skeleton,
        variants,
        discarded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig_retarget::{Mesh, ObjectRole, Skeleton};

    fn spec(tag: &str) -> VariantSpec {
        VariantSpec {
            tag: tag.into(),
            name_contains: tag.into(),
            output: PathBuf::from(format!("{tag}.json")),
        }
    }

    #[test]
    fn keeps_wanted_meshes_in_config_order() {
        let mut scene = SceneGraph::new("t");
        scene.add_object("Rig", ObjectRole::Skeleton(Skeleton::default()));
        scene.add_object("Body_Female", ObjectRole::Mesh(Mesh::default()));
        scene.add_object("Cube", ObjectRole::Mesh(Mesh::default()));
        scene.add_object("Body_Male", ObjectRole::Mesh(Mesh::default()));

        let resolved = resolve_target(&mut scene, &[spec("Male"), spec("Female")]).unwrap();
        let tags: Vec<_> = resolved.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(tags, vec!["Body_Male", "Body_Female"]);
        assert_eq!(resolved.discarded, vec!["Cube".to_string()]);
        assert!(scene.find_by_name("Cube").is_none());
        assert_eq!(resolved.skeleton.name, "Rig");
    }

    #[test]
    fn no_skeleton_resolves_to_none() {
        let mut scene = SceneGraph::new("t");
        scene.add_object("Body_Male", ObjectRole::Mesh(Mesh::default()));
        assert!(resolve_target(&mut scene, &[spec("Male")]).is_none());
    }

    #[test]
    fn second_match_for_a_claimed_variant_is_discarded() {
        let mut scene = SceneGraph::new("t");
        scene.add_object("Rig", ObjectRole::Skeleton(Skeleton::default()));
        scene.add_object("Male_LOD0", ObjectRole::Mesh(Mesh::default()));
        scene.add_object("Male_LOD1", ObjectRole::Mesh(Mesh::default()));
        let resolved = resolve_target(&mut scene, &[spec("Male")]).unwrap();
        assert_eq!(resolved.variants.len(), 1);
        assert_eq!(resolved.variants[0].name, "Male_LOD0");
        assert_eq!(resolved.discarded, vec!["Male_LOD1".to_string()]);
    }
}
