use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Result of exporting one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOutcome {
    pub tag: String,
    pub output: PathBuf,
    /// Size of the written bundle in bytes; `None` when the export failed.
    pub bytes: Option<u64>,
    /// `None` on success, the error message otherwise.
    pub error: Option<String>,
}

impl VariantOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub clips_remapped: usize,
    /// Source clips not named in the clip table.
    pub clips_ignored: usize,
    /// Clip table entries with no clip in the source bundle.
    pub clips_missing: Vec<String>,
    pub channels_rewritten: usize,
    pub channels_passed_through: usize,
    pub channels_dropped: usize,
    pub meshes_discarded: usize,
    pub variants: Vec<VariantOutcome>,
}

impl RunSummary {
    pub fn exported(&self) -> usize {
        self.variants.iter().filter(|v| v.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.variants.len() - self.exported()
    }

    pub fn log(&self) {
        info!(
            "retarget finished: {} clips remapped ({} ignored, {} missing), {} channels rewritten, {} passed through, {} dropped",
            self.clips_remapped,
            self.clips_ignored,
            self.clips_missing.len(),
            self.channels_rewritten,
            self.channels_passed_through,
            self.channels_dropped
        );
        for v in &self.variants {
            match &v.error {
                None => info!(
                    "  {} -> {} ({} KB)",
                    v.tag,
                    v.output.display(),
                    v.bytes.unwrap_or(0).div_ceil(1024)
                ),
                Some(e) => warn!("  {} FAILED: {}", v.tag, e),
            }
        }
        info!(
            "variants exported: {}, failed: {}",
            self.exported(),
            self.failed()
        );
    }
}
