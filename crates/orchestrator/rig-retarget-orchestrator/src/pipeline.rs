//! Pipeline steps driven by [`Orchestrator::run`](crate::Orchestrator::run).
//!
//! Each step takes the scene graph it works on explicitly; nothing here holds
//! on to a scene between calls.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use rig_retarget::{
    AnimationLibrary, ChannelRemapper, ClipRegistry, RemapStats, RetargetConfig, SceneGraph,
};

use crate::bundle_io::BundleIo;
use crate::diagnostics::{RunSummary, VariantOutcome};
use crate::exporter::VariantExporter;
use crate::resolve::ResolvedTarget;

/// Remap every selected source clip into `registry`.
///
/// Clips are visited in source bundle order, which is the order the library
/// later uses. Unselected clips are counted and dropped; table entries without
/// a source clip are reported as missing.
pub fn remap_source(
    config: &RetargetConfig,
    source: &SceneGraph,
    registry: &mut ClipRegistry,
    summary: &mut RunSummary,
) {
    let remapper = ChannelRemapper::new(&config.bone_map, config.unmapped_channels);
    let mut totals = RemapStats::default();

    for clip in source.clips() {
        let Some(output) = config.clips.output_name(&clip.name) else {
            debug!("clip '{}' not selected; ignored", clip.name);
            summary.clips_ignored += 1;
            continue;
        };
        let (retargeted, stats) = remapper.remap_with_stats(clip, output);
        debug!(
            "clip '{}' -> '{}': {} rewritten, {} passed through, {} dropped",
            clip.name, output, stats.rewritten, stats.passed_through, stats.dropped
        );
        totals.merge(stats);
        if registry.put(retargeted).is_some() {
            warn!("clip '{}' produced more than once; keeping the last", output);
        } else {
            summary.clips_remapped += 1;
        }
    }

    for (name, _) in config.clips.iter() {
        if source.clip(name).is_none() {
            warn!("clip '{}' listed for retargeting but absent from source", name);
            summary.clips_missing.push(name.to_string());
        }
    }

    summary.channels_rewritten += totals.rewritten;
    summary.channels_passed_through += totals.passed_through;
    summary.channels_dropped += totals.dropped;
}

/// Destination of a variant, anchored at `root` when the configured path is relative.
pub fn output_path(root: Option<&Path>, output: &Path) -> PathBuf {
    match root {
        Some(root) if output.is_relative() => root.join(output),
        _ => output.to_path_buf(),
    }
}

/// Export every resolved variant in order, siblings being all the others.
///
/// A failed variant is recorded and the loop continues. `on_attempt` is called
/// with the number of variants attempted so far.
pub fn export_variants<IO: BundleIo + ?Sized>(
    io: &mut IO,
    config: &RetargetConfig,
    scene: &mut SceneGraph,
    resolved: &ResolvedTarget,
    library: &AnimationLibrary,
    output_root: Option<&Path>,
    summary: &mut RunSummary,
    mut on_attempt: impl FnMut(usize),
) {
    let exporter = VariantExporter::new(&config.export);
    for (i, variant) in resolved.variants.iter().enumerate() {
        let siblings: Vec<_> = resolved
            .variants
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, v)| v.clone())
            .collect();
        let target = output_path(output_root, &variant.output);

        let result = exporter.export_variant(
            io,
            scene,
            &resolved.skeleton,
            variant,
            library,
            &siblings,
            &target,
        );
        let (bytes, error) = match result {
            Ok(bytes) => (Some(bytes), None),
            Err(e) => {
                warn!("variant '{}' export failed: {}", variant.tag, e);
                (None, Some(e.to_string()))
            }
        };

        summary.variants.push(VariantOutcome {
            tag: variant.tag.clone(),
            output: target,
            bytes,
            error,
        });
        on_attempt(i + 1);
    }
}
