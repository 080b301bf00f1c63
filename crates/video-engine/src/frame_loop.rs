//! The per-frame annotation driver.
//!
//! ```text
//! source ── frame 0 ── gray ─────────────┐ (previous)
//!        └─ frame n ── gray ── estimate ─┴─ field ── mean ── classify
//!                 │                                              │
//!                 └──────────────── draw overlay ◄───────────────┘
//!                                        │
//!                                        ▼
//!                                      sink
//! ```
//!
//! The first frame only seeds the previous grayscale frame; it is never
//! written. Every later frame is annotated with the motion since its
//! predecessor.

use flowsteer_common::config::{AppConfig, OverlayConfig};
use flowsteer_common::error::{FlowsteerError, FlowsteerResult};
use flowsteer_motion_model::direction::ClassificationResult;
use flowsteer_processing_core::aggregate::FlowAggregator;
use flowsteer_processing_core::classify::DirectionClassifier;
use flowsteer_processing_core::tally::DirectionTally;

use crate::backend::{FlowEstimator, FrameSink, FrameSource, OverlayRenderer, VideoGeometry};
use crate::overlay::OverlayText;

/// Progress callback, invoked after each annotated frame.
pub type ProgressCallback = Box<dyn Fn(LoopProgress) + Send>;

/// Progress report for one annotated frame.
#[derive(Debug, Clone, Copy)]
pub struct LoopProgress {
    /// Frames written so far, including this one.
    pub frames_written: u64,

    /// Decision for this frame.
    pub result: ClassificationResult,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct LoopSummary {
    pub geometry: VideoGeometry,
    pub frames_read: u64,
    pub frames_written: u64,
    pub tally: DirectionTally,
}

/// Drives source → estimator → classifier → renderer → sink.
pub struct FrameLoop {
    aggregator: FlowAggregator,
    classifier: DirectionClassifier,
    overlay: OverlayConfig,
    progress: Option<ProgressCallback>,
}

impl FrameLoop {
    pub fn new(classifier: DirectionClassifier, overlay: OverlayConfig) -> Self {
        Self {
            aggregator: FlowAggregator::new(),
            classifier,
            overlay,
            progress: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DirectionClassifier::from_config(&config.classifier),
            config.overlay,
        )
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Annotate every frame of `source`.
    ///
    /// `open_sink` is only called once the first frame has been decoded, so an
    /// unreadable source never produces an output file. The sink is finished
    /// on success and dropped on any error.
    pub fn run<S, K, E, R, O>(
        &self,
        source: &mut S,
        open_sink: O,
        estimator: &mut E,
        renderer: &R,
    ) -> FlowsteerResult<LoopSummary>
    where
        S: FrameSource,
        K: FrameSink<S::Frame>,
        E: FlowEstimator<S::Frame>,
        R: OverlayRenderer<S::Frame>,
        O: FnOnce(VideoGeometry) -> FlowsteerResult<K>,
    {
        let first = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                return Err(FlowsteerError::source_unreadable(format!(
                    "{} yielded no frames",
                    source.name()
                )))
            }
            Err(e) => {
                return Err(FlowsteerError::source_unreadable(format!(
                    "failed to decode first frame of {}: {e}",
                    source.name()
                )))
            }
        };

        let geometry = source.geometry();
        tracing::info!(
            source = source.name(),
            estimator = estimator.name(),
            width = geometry.width,
            height = geometry.height,
            fps = geometry.fps,
            threshold = self.classifier.threshold(),
            "Starting frame loop"
        );

        let mut sink = open_sink(geometry)?;
        let mut prev_gray = estimator.to_gray(&first)?;
        drop(first);

        let mut tally = DirectionTally::new();
        let mut frames_read = 1u64;
        let mut frames_written = 0u64;

        while let Some(mut frame) = source.read_frame()? {
            frames_read += 1;

            let gray = estimator.to_gray(&frame)?;
            let field = estimator.estimate(&prev_gray, &gray)?;
            let motion = self.aggregator.aggregate(&field)?;
            let result = self.classifier.classify(motion);

            tracing::debug!(
                frame = frames_read - 1,
                dx = motion.dx,
                dy = motion.dy,
                direction = %result.direction,
                angle = result.angle_deg,
                "Classified frame"
            );

            renderer.draw(&mut frame, &OverlayText::for_result(&result, &self.overlay))?;
            sink.write_frame(&frame)?;
            frames_written += 1;
            tally.record(&result);

            if let Some(cb) = &self.progress {
                cb(LoopProgress {
                    frames_written,
                    result,
                });
            }

            prev_gray = gray;
        }

        sink.finish()?;

        tracing::info!(
            frames_read,
            frames_written,
            turning = tally.turning_frames(),
            coarse = tally.coarse_frames(),
            "Frame loop complete"
        );

        Ok(LoopSummary {
            geometry,
            frames_read,
            frames_written,
            tally,
        })
    }
}
