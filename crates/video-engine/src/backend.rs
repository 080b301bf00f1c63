//! Collaborator contracts for the frame loop.
//!
//! The loop is generic over the frame type so that real codecs and in-memory
//! test doubles plug into the same driver.

use flowsteer_common::error::FlowsteerResult;
use flowsteer_motion_model::field::MotionField;
use serde::{Deserialize, Serialize};

use crate::overlay::OverlayText;

/// Frame dimensions and rate reported by a source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl VideoGeometry {
    /// Frame rate handed to the writer: the source rate truncated to whole frames.
    pub fn output_fps(&self) -> f64 {
        self.fps.trunc()
    }
}

/// A decoded video stream.
pub trait FrameSource {
    type Frame;

    /// Dimensions and frame rate of the stream.
    fn geometry(&self) -> VideoGeometry;

    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn read_frame(&mut self) -> FlowsteerResult<Option<Self::Frame>>;

    /// Source name for logs.
    fn name(&self) -> &str;
}

/// Destination for annotated frames.
pub trait FrameSink<F> {
    fn write_frame(&mut self, frame: &F) -> FlowsteerResult<()>;

    /// Flush and release the sink. Must be safe to call more than once.
    fn finish(&mut self) -> FlowsteerResult<()>;
}

/// Dense optical-flow estimator.
pub trait FlowEstimator<F> {
    /// Single-channel intensity frame.
    type Gray;

    fn to_gray(&self, frame: &F) -> FlowsteerResult<Self::Gray>;

    /// Per-pixel motion from `prev` to `next`. Both frames share dimensions and
    /// the returned field matches them.
    fn estimate(&mut self, prev: &Self::Gray, next: &Self::Gray) -> FlowsteerResult<MotionField>;

    /// Estimator name for logs.
    fn name(&self) -> &str;
}

/// Draws overlay text onto a frame.
pub trait OverlayRenderer<F> {
    fn draw(&self, frame: &mut F, overlay: &OverlayText) -> FlowsteerResult<()>;
}
