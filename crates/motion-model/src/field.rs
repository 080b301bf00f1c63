//! Dense motion fields and motion vectors.

use serde::{Deserialize, Serialize};

/// A single 2-D displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionVector {
    pub dx: f64,
    pub dy: f64,
}

impl MotionVector {
    pub const ZERO: MotionVector = MotionVector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// `atan2(dy, dx)` in degrees, in (-180, 180].
    pub fn angle_degrees(&self) -> f64 {
        self.dy.atan2(self.dx).to_degrees()
    }

    /// Whether the horizontal component strictly dominates the vertical one.
    pub fn is_horizontal_dominant(&self) -> bool {
        self.dx.abs() > self.dy.abs()
    }
}

impl From<(f32, f32)> for MotionVector {
    fn from((dx, dy): (f32, f32)) -> Self {
        Self::new(dx as f64, dy as f64)
    }
}

impl From<(f64, f64)> for MotionVector {
    fn from((dx, dy): (f64, f64)) -> Self {
        Self::new(dx, dy)
    }
}

/// A `height` x `width` grid of motion vectors in row-major order.
///
/// A zero-area field is representable; consumers that need at least one
/// cell must check [`MotionField::is_empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct MotionField {
    width: usize,
    height: usize,
    vectors: Vec<MotionVector>,
}

impl MotionField {
    /// Build a field from row-major vectors.
    pub fn from_vectors(
        width: usize,
        height: usize,
        vectors: Vec<MotionVector>,
    ) -> Result<Self, FieldError> {
        let expected = width
            .checked_mul(height)
            .ok_or(FieldError::TooLarge { width, height })?;
        if vectors.len() != expected {
            return Err(FieldError::ShapeMismatch {
                width,
                height,
                len: vectors.len(),
            });
        }
        Ok(Self {
            width,
            height,
            vectors,
        })
    }

    /// Build a field from interleaved `(u, v)` f32 components, as flow
    /// estimators and `.flo` files lay them out.
    pub fn from_interleaved(width: usize, height: usize, data: &[f32]) -> Result<Self, FieldError> {
        if data.len() % 2 != 0 {
            return Err(FieldError::OddComponentCount { len: data.len() });
        }
        let vectors = data
            .chunks_exact(2)
            .map(|uv| MotionVector::from((uv[0], uv[1])))
            .collect();
        Self::from_vectors(width, height, vectors)
    }

    /// A field where every cell holds the same vector.
    pub fn uniform(
        width: usize,
        height: usize,
        vector: MotionVector,
    ) -> Result<Self, FieldError> {
        let len = width
            .checked_mul(height)
            .ok_or(FieldError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            vectors: vec![vector; len],
        })
    }

    /// The zero-area field.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            vectors: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dim(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<MotionVector> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.vectors.get(y * self.width + x).copied()
    }

    /// Row-major view of all cells.
    pub fn vectors(&self) -> &[MotionVector] {
        &self.vectors
    }
}

/// Errors constructing a [`MotionField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field of {width}x{height} needs {} vectors, got {len}", .width * .height)]
    ShapeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("field of {width}x{height} overflows addressable size")]
    TooLarge { width: usize, height: usize },

    #[error("interleaved flow data has an odd number of components ({len})")]
    OddComponentCount { len: usize },
}
