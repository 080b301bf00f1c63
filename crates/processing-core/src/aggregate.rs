//! Motion field aggregation.

use flowsteer_common::error::{FlowsteerError, FlowsteerResult};
use flowsteer_motion_model::field::{MotionField, MotionVector};

/// Reduces a dense motion field to a single representative vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowAggregator;

impl FlowAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Arithmetic mean of `dx` and of `dy` over every cell.
    ///
    /// No weighting, masking or outlier rejection. A zero-area field is an
    /// [`FlowsteerError::InvalidInput`].
    pub fn aggregate(&self, field: &MotionField) -> FlowsteerResult<MotionVector> {
        mean_motion(field)
    }
}

/// Mean motion of a field, failing on a zero-area field.
///
/// Uses a running mean so a field of identical vectors yields that vector
/// exactly and large fields do not accumulate a huge intermediate sum.
pub fn mean_motion(field: &MotionField) -> FlowsteerResult<MotionVector> {
    if field.is_empty() {
        let (width, height) = field.dim();
        return Err(FlowsteerError::invalid_input(format!(
            "cannot aggregate a {width}x{height} motion field"
        )));
    }

    let mut mean_dx = 0.0_f64;
    let mut mean_dy = 0.0_f64;
    for (i, v) in field.vectors().iter().enumerate() {
        let n = (i + 1) as f64;
        mean_dx += (v.dx - mean_dx) / n;
        mean_dy += (v.dy - mean_dy) / n;
    }

    Ok(MotionVector::new(mean_dx, mean_dy))
}
