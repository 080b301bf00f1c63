//! Overlay text for annotated frames.

use flowsteer_common::config::OverlayConfig;
use flowsteer_motion_model::direction::ClassificationResult;

/// A single line of text to burn into a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub text: String,
    /// Text origin in pixels.
    pub x: i32,
    pub y: i32,
    pub font_scale: f64,
    pub color_bgr: [u8; 3],
    pub thickness: i32,
}

impl OverlayText {
    /// Overlay for a classification, e.g. `"medium left, Angle: 59.04"`.
    pub fn for_result(result: &ClassificationResult, style: &OverlayConfig) -> Self {
        Self {
            text: format_label(result),
            x: style.x,
            y: style.y,
            font_scale: style.font_scale,
            color_bgr: style.color_bgr,
            thickness: style.thickness,
        }
    }
}

/// `"{direction}, Angle: {angle:.2}"`.
pub fn format_label(result: &ClassificationResult) -> String {
    result.to_string()
}
