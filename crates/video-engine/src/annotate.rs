//! Annotating a video file end to end.

use std::path::PathBuf;

use flowsteer_common::config::AppConfig;
use flowsteer_common::error::{FlowsteerError, FlowsteerResult};

use crate::frame_loop::ProgressCallback;
use crate::report::AnnotationReport;

/// An annotation job ready to run.
pub struct AnnotateJob {
    /// Input video path.
    pub input: PathBuf,

    /// Output video path.
    pub output: PathBuf,

    /// Effective configuration (classifier, estimator, overlay, codec).
    pub config: AppConfig,

    /// Where to write a JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,

    /// Per-frame progress callback.
    pub progress: Option<ProgressCallback>,
}

/// Annotate `job.input` into `job.output`.
///
/// The frame loop is CPU bound, so it runs on a blocking worker.
pub async fn annotate_video(job: AnnotateJob) -> FlowsteerResult<AnnotationReport> {
    tracing::info!(
        input = %job.input.display(),
        output = %job.output.display(),
        "Starting annotation"
    );

    if !job.input.exists() {
        return Err(FlowsteerError::FileNotFound { path: job.input });
    }
    job.config.validate()?;

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let report_path = job.report_path.clone();
    let report = tokio::task::spawn_blocking(move || annotate_blocking(job))
        .await
        .map_err(|e| FlowsteerError::Other(anyhow::anyhow!("annotation worker failed: {e}")))??;

    if let Some(path) = report_path {
        report.write_json(&path)?;
    }

    tracing::info!(
        frames = report.frames_written,
        elapsed_secs = report.elapsed_secs(),
        "Annotation complete"
    );
    Ok(report)
}

#[cfg(feature = "opencv")]
fn annotate_blocking(job: AnnotateJob) -> FlowsteerResult<AnnotationReport> {
    use chrono::Utc;

    use crate::frame_loop::FrameLoop;
    use crate::opencv_backend::{FarnebackEstimator, OpenCvRenderer, OpenCvSink, OpenCvSource};

    let started_at = Utc::now();
    let fourcc = job.config.output.fourcc_chars()?;

    let mut frame_loop = FrameLoop::from_config(&job.config);
    if let Some(progress) = job.progress {
        frame_loop = frame_loop.with_progress(progress);
    }

    let mut source = OpenCvSource::open(&job.input)?;
    let mut estimator = FarnebackEstimator::new(job.config.farneback);
    let output = job.output.clone();

    let summary = frame_loop.run(
        &mut source,
        |geometry| OpenCvSink::create(&output, fourcc, geometry),
        &mut estimator,
        &OpenCvRenderer,
    )?;

    Ok(AnnotationReport::from_summary(
        job.input,
        job.output,
        summary,
        started_at,
    ))
}

#[cfg(not(feature = "opencv"))]
fn annotate_blocking(_job: AnnotateJob) -> FlowsteerResult<AnnotationReport> {
    Err(FlowsteerError::unsupported(
        "video annotation needs the `opencv` feature (rebuild with --features opencv)",
    ))
}
