//! rig-retarget orchestrator
//!
//! Sequences one retarget run:
//! load source → remap selected clips into the registry → discard source →
//! load target → resolve skeleton and variants → assemble library →
//! export one bundle per variant.
//!
//! The run is strictly sequential. Only one scene graph is alive at a time;
//! the [`ClipRegistry`] is the one piece of state that survives the source
//! scene being discarded.

pub mod bundle_io;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod exporter;
pub mod pipeline;
pub mod resolve;

use std::path::{Path, PathBuf};

use log::{debug, error};
use serde::{Deserialize, Serialize};

use rig_retarget::{assemble, ClipRegistry, RetargetConfig};

pub use crate::bundle_io::{BundleIo, JsonBundleIo, MemoryBundleIo};
pub use crate::diagnostics::{RunSummary, VariantOutcome};
pub use crate::error::{ExportError, PipelineError};
pub use crate::exporter::VariantExporter;
pub use crate::resolve::{resolve_target, MeshVariant, ResolvedTarget};

/// Where a run currently is. `Failed` is reachable from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Init,
    SourceLoaded,
    Remapped,
    TargetLoaded,
    Resolved,
    /// Number of variants attempted so far.
    Exported(usize),
    Done {
        exported: usize,
        failed: usize,
    },
    Failed,
}

#[derive(Debug)]
pub struct Orchestrator<IO: BundleIo> {
    pub config: RetargetConfig,
    /// Retargeted clips; outlives every scene graph of the run.
    pub registry: ClipRegistry,
    io: IO,
    state: PipelineState,
    output_root: Option<PathBuf>,
}

impl<IO: BundleIo> Orchestrator<IO> {
    /// Create an orchestrator for a validated configuration.
    pub fn new(config: RetargetConfig, io: IO) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: ClipRegistry::new(),
            io,
            state: PipelineState::Init,
            output_root: None,
        })
    }

    /// Resolve relative variant outputs against `root`.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("pipeline: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the whole pipeline.
    ///
    /// Fatal failures stop the run in [`PipelineState::Failed`]. Per-variant
    /// export failures do not; they are counted in the returned summary.
    pub fn run(&mut self, source: &Path, target: &Path) -> Result<RunSummary, PipelineError> {
        self.state = PipelineState::Init;
        self.registry.clear();

        let mut summary = RunSummary::default();
        match self.run_steps(source, target, &mut summary) {
            Ok(()) => {
                self.transition(PipelineState::Done {
                    exported: summary.exported(),
                    failed: summary.failed(),
                });
                summary.log();
                Ok(summary)
            }
            Err(e) => {
                error!("retarget run failed in state {:?}: {}", self.state, e);
                self.transition(PipelineState::Failed);
                Err(e)
            }
        }
    }

    fn run_steps(
        &mut self,
        source_path: &Path,
        target_path: &Path,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let source = self
            .io
            .load(source_path)
            .map_err(PipelineError::SourceLoad)?;
        self.transition(PipelineState::SourceLoaded);

        pipeline::remap_source(&self.config, &source, &mut self.registry, summary);
        source.discard();
        self.transition(PipelineState::Remapped);

        let mut target = self
            .io
            .load(target_path)
            .map_err(PipelineError::TargetLoad)?;
        if !target.clips().is_empty() {
            debug!(
                "ignoring {} clips of target '{}'",
                target.clips().len(),
                target.name
            );
        }
        self.transition(PipelineState::TargetLoaded);

        let resolved = resolve_target(&mut target, &self.config.variants).ok_or_else(|| {
            PipelineError::NoSkeleton {
                path: target_path.to_path_buf(),
            }
        })?;
        summary.meshes_discarded = resolved.discarded.len();
        self.transition(PipelineState::Resolved);

        let library = assemble(resolved.skeleton.clone(), self.registry.all());
        let mut attempted = 0;
        pipeline::export_variants(
            &mut self.io,
            &self.config,
            &mut target,
            &resolved,
            &library,
            self.output_root.as_deref(),
            summary,
            |n| attempted = n,
        );
        self.transition(PipelineState::Exported(attempted));

        target.discard();
        Ok(())
    }
}
