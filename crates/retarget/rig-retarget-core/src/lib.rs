//! rig-retarget core (host-agnostic)
//!
//! Moves animation clips authored against a source rig onto a target rig by
//! rewriting the bone identifiers embedded in channel paths, then assembles
//! the surviving clips into an ordered library bound to the target skeleton.
//!
//! Loading and writing bundles is not done here; the orchestrator crate drives
//! the pipeline through its `BundleIo` trait.

pub mod bone_map;
pub mod bone_path;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod ids;
pub mod library;
pub mod registry;
pub mod remap;
pub mod scene;
pub mod selection;
pub mod stored_bundle;

// Re-exports for consumers (orchestrator, tools)
pub use bone_map::BoneNameMap;
pub use config::{ExportOptions, RetargetConfig, UnmappedChannelPolicy, VariantSpec};
pub use data::{Channel, Clip, Interpolation, Keyframe};
pub use error::{BundleError, ConfigError};
pub use export::{ExportArtifact, SelectionError};
pub use ids::ObjectId;
pub use library::{assemble, AnimationLibrary, LibraryEntry, SkeletonBinding};
pub use registry::ClipRegistry;
pub use remap::{remap, ChannelRemapper, RemapStats, RetargetedClip};
pub use scene::{
    Bone, Mesh, ObjectKind, ObjectRole, SceneGraph, SceneObject, Skeleton, SkeletonAnimation,
    SkinBinding, TimelineSegment,
};
pub use selection::ClipSelectionTable;
pub use stored_bundle::{parse_bundle_json, StoredBundle};
