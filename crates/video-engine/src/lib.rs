//! Flowsteer Video Engine
//!
//! Drives the per-frame annotation of a video:
//!
//! ```text
//! input.mp4 ── decode ── grayscale ── dense flow ── mean motion
//!                 │                                     │
//!                 │                                 classify
//!                 │                                     │
//!                 └──────── overlay "{label}, Angle: {deg}" ◄─┘
//!                                     │
//!                                     ▼
//!                                 output.mp4
//! ```
//!
//! Decoding, flow estimation, drawing and encoding sit behind the traits in
//! [`backend`]. The OpenCV implementations are behind the `opencv` feature.

pub mod annotate;
pub mod backend;
pub mod frame_loop;
#[cfg(feature = "opencv")]
pub mod opencv_backend;
pub mod overlay;
pub mod report;

pub use annotate::{annotate_video, AnnotateJob};
pub use backend::*;
pub use frame_loop::{FrameLoop, LoopProgress, LoopSummary, ProgressCallback};
pub use report::AnnotationReport;
