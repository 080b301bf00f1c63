//! OpenCV implementations of the frame loop collaborators.
//!
//! Frames are BGR `Mat`s straight from `VideoCapture`. Capture and writer
//! handles are released on drop, so an early return anywhere in the loop
//! still closes both files.

use std::path::{Path, PathBuf};

use flowsteer_common::config::FarnebackParams;
use flowsteer_common::error::{FlowsteerError, FlowsteerResult};
use flowsteer_motion_model::field::{MotionField, MotionVector};
use opencv::core::{Mat, Point, Scalar, Size, Vec2f};
use opencv::prelude::*;
use opencv::{imgproc, video, videoio};

use crate::backend::{FlowEstimator, FrameSink, FrameSource, OverlayRenderer, VideoGeometry};
use crate::overlay::OverlayText;

fn cv_err(e: opencv::Error) -> FlowsteerError {
    FlowsteerError::video(e.to_string())
}

fn path_str(path: &Path) -> FlowsteerResult<&str> {
    path.to_str().ok_or_else(|| {
        FlowsteerError::invalid_input(format!("path is not valid UTF-8: {}", path.display()))
    })
}

/// Video file decoded through `VideoCapture`.
pub struct OpenCvSource {
    capture: videoio::VideoCapture,
    geometry: VideoGeometry,
    name: String,
}

impl OpenCvSource {
    pub fn open(path: &Path) -> FlowsteerResult<Self> {
        let capture =
            videoio::VideoCapture::from_file(path_str(path)?, videoio::CAP_ANY).map_err(cv_err)?;
        if !capture.is_opened().map_err(cv_err)? {
            return Err(FlowsteerError::source_unreadable(format!(
                "unable to open {}",
                path.display()
            )));
        }

        let geometry = VideoGeometry {
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH).map_err(cv_err)? as u32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT).map_err(cv_err)? as u32,
            fps: capture.get(videoio::CAP_PROP_FPS).map_err(cv_err)?,
        };

        tracing::debug!(
            path = %path.display(),
            width = geometry.width,
            height = geometry.height,
            fps = geometry.fps,
            "Opened video source"
        );

        Ok(Self {
            capture,
            geometry,
            name: path.display().to_string(),
        })
    }
}

impl FrameSource for OpenCvSource {
    type Frame = Mat;

    fn geometry(&self) -> VideoGeometry {
        self.geometry
    }

    fn read_frame(&mut self) -> FlowsteerResult<Option<Mat>> {
        let mut frame = Mat::default();
        let ok = self.capture.read(&mut frame).map_err(cv_err)?;
        if !ok || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for OpenCvSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            tracing::warn!(source = %self.name, error = %e, "Failed to release video source");
        }
    }
}

/// Video file encoded through `VideoWriter`.
pub struct OpenCvSink {
    writer: videoio::VideoWriter,
    path: PathBuf,
    released: bool,
}

impl OpenCvSink {
    pub fn create(path: &Path, fourcc: [char; 4], geometry: VideoGeometry) -> FlowsteerResult<Self> {
        let [a, b, c, d] = fourcc;
        let code = videoio::VideoWriter::fourcc(a, b, c, d).map_err(cv_err)?;
        let size = Size::new(geometry.width as i32, geometry.height as i32);
        let writer = videoio::VideoWriter::new(
            path_str(path)?,
            code,
            geometry.output_fps(),
            size,
            true,
        )
        .map_err(cv_err)?;

        if !writer.is_opened().map_err(cv_err)? {
            return Err(FlowsteerError::video(format!(
                "unable to open video writer for {} (fourcc {a}{b}{c}{d})",
                path.display()
            )));
        }

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            released: false,
        })
    }
}

impl FrameSink<Mat> for OpenCvSink {
    fn write_frame(&mut self, frame: &Mat) -> FlowsteerResult<()> {
        self.writer.write(frame).map_err(cv_err)
    }

    fn finish(&mut self) -> FlowsteerResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.writer.release().map_err(cv_err)
    }
}

impl Drop for OpenCvSink {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(output = %self.path.display(), error = %e, "Failed to release video writer");
        }
    }
}

/// Farneback dense optical flow.
pub struct FarnebackEstimator {
    params: FarnebackParams,
}

impl FarnebackEstimator {
    pub fn new(params: FarnebackParams) -> Self {
        Self { params }
    }
}

impl FlowEstimator<Mat> for FarnebackEstimator {
    type Gray = Mat;

    fn to_gray(&self, frame: &Mat) -> FlowsteerResult<Mat> {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0).map_err(cv_err)?;
        Ok(gray)
    }

    fn estimate(&mut self, prev: &Mat, next: &Mat) -> FlowsteerResult<MotionField> {
        let p = self.params;
        let mut flow = Mat::default();
        video::calc_optical_flow_farneback(
            prev,
            next,
            &mut flow,
            p.pyr_scale,
            p.levels,
            p.winsize,
            p.iterations,
            p.poly_n,
            p.poly_sigma,
            p.flags,
        )
        .map_err(cv_err)?;

        let width = flow.cols().max(0) as usize;
        let height = flow.rows().max(0) as usize;
        let vectors = flow
            .data_typed::<Vec2f>()
            .map_err(cv_err)?
            .iter()
            .map(|v| MotionVector::from((v[0], v[1])))
            .collect();

        MotionField::from_vectors(width, height, vectors)
            .map_err(|e| FlowsteerError::invalid_input(e.to_string()))
    }

    fn name(&self) -> &str {
        "farneback"
    }
}

/// Draws overlay text with the Hershey simplex font.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvRenderer;

impl OverlayRenderer<Mat> for OpenCvRenderer {
    fn draw(&self, frame: &mut Mat, overlay: &OverlayText) -> FlowsteerResult<()> {
        let [b, g, r] = overlay.color_bgr;
        imgproc::put_text(
            frame,
            &overlay.text,
            Point::new(overlay.x, overlay.y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            overlay.font_scale,
            Scalar::new(b as f64, g as f64, r as f64, 0.0),
            overlay.thickness,
            imgproc::LINE_8,
            false,
        )
        .map_err(cv_err)
    }
}
