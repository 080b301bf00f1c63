//! Run reports written alongside annotated videos.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flowsteer_common::error::FlowsteerResult;
use flowsteer_processing_core::tally::DirectionTally;
use serde::{Deserialize, Serialize};

use crate::backend::VideoGeometry;
use crate::frame_loop::LoopSummary;

/// Summary of one annotation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub geometry: VideoGeometry,
    pub frames_read: u64,
    pub frames_written: u64,
    pub tally: DirectionTally,
    pub mean_turning_angle: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AnnotationReport {
    pub fn from_summary(
        input: PathBuf,
        output: PathBuf,
        summary: LoopSummary,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            input,
            output,
            geometry: summary.geometry,
            frames_read: summary.frames_read,
            frames_written: summary.frames_written,
            mean_turning_angle: summary.tally.mean_turning_angle(),
            tally: summary.tally,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Wall-clock duration of the run in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: &Path) -> FlowsteerResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(report = %path.display(), "Wrote annotation report");
        Ok(())
    }
}
