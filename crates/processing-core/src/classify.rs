//! Direction classification.
//!
//! Maps a mean motion vector to a [`Direction`] and a folded turning angle.
//!
//! The raw angle is `atan2(dy, dx)` in degrees. Only horizontally dominant
//! motion (`|dx| > |dy|`) whose horizontal component clears the threshold is
//! treated as a turn; everything else is `Straight` at 0 degrees.
//!
//! Positive `dx` is reported as a left turn: the scene sliding right means
//! the camera is turning left. Folding rules per side:
//!
//! ```text
//! Left  (dx >  threshold):  -90 < raw < 0  ->  90 + raw
//!                             0 < raw < 90 ->  180 - (90 - raw)
//! Right (dx < -threshold):  raw < -90      ->  90 - (180 + raw)
//!                           raw >  90      ->  90 + (180 - raw)
//! ```
//!
//! Any other raw angle is used unfolded. The folded angle is bucketed with
//! open intervals (0, 30), (30, 60) and (60, inf). Angles landing exactly on
//! 0, 30 or 60, or below 0, keep the coarse `Left`/`Right` label.

use flowsteer_common::config::ClassifierConfig;
use flowsteer_common::error::FlowsteerResult;
use flowsteer_motion_model::direction::{ClassificationResult, Direction, Side, TurnSize};
use flowsteer_motion_model::field::{MotionField, MotionVector};

use crate::aggregate::mean_motion;

/// Default minimum horizontal displacement for a turn.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Direction classification engine.
///
/// Stateless apart from its threshold; safe to share across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionClassifier {
    threshold: f64,
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl DirectionClassifier {
    /// Create a classifier with the given horizontal threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify a single motion vector.
    pub fn classify(&self, motion: MotionVector) -> ClassificationResult {
        if !motion.is_horizontal_dominant() {
            return ClassificationResult::STRAIGHT;
        }

        let raw = motion.angle_degrees();
        let (side, angle) = if motion.dx > self.threshold {
            (Side::Left, fold_left(raw))
        } else if motion.dx < -self.threshold {
            (Side::Right, fold_right(raw))
        } else {
            return ClassificationResult::STRAIGHT;
        };

        let size = bucket(angle);
        if size.is_none() {
            tracing::trace!(
                dx = motion.dx,
                dy = motion.dy,
                raw,
                angle,
                "Folded angle outside every bucket; keeping coarse label"
            );
        }

        ClassificationResult::new(Direction::turn(side, size), angle)
    }

    /// Aggregate a field to its mean motion and classify it.
    pub fn classify_field(&self, field: &MotionField) -> FlowsteerResult<ClassificationResult> {
        let motion = mean_motion(field)?;
        Ok(self.classify(motion))
    }
}

fn fold_left(raw: f64) -> f64 {
    if -90.0 < raw && raw < 0.0 {
        90.0 + raw
    } else if 0.0 < raw && raw < 90.0 {
        180.0 - (90.0 - raw)
    } else {
        raw
    }
}

fn fold_right(raw: f64) -> f64 {
    if raw < -90.0 {
        90.0 - (180.0 + raw)
    } else if raw > 90.0 {
        90.0 + (180.0 - raw)
    } else {
        raw
    }
}

/// Open-interval buckets; boundaries and negatives fall through.
fn bucket(angle: f64) -> Option<TurnSize> {
    if 0.0 < angle && angle < 30.0 {
        Some(TurnSize::Small)
    } else if 30.0 < angle && angle < 60.0 {
        Some(TurnSize::Medium)
    } else if 60.0 < angle {
        Some(TurnSize::Large)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(dx: f64, dy: f64) -> ClassificationResult {
        DirectionClassifier::default().classify(MotionVector::new(dx, dy))
    }

    #[test]
    fn test_pure_horizontal_left_hits_zero_boundary() {
        let result = classify(5.0, 0.0);
        assert_eq!(result.direction, Direction::Left);
        assert_eq!(result.angle_deg, 0.0);
    }

    #[test]
    fn test_diagonal_tie_is_straight() {
        assert_eq!(classify(5.0, 5.0), ClassificationResult::STRAIGHT);
        assert_eq!(classify(5.0, -5.0), ClassificationResult::STRAIGHT);
    }

    #[test]
    fn test_vertical_dominance_overrides_strong_dx() {
        assert_eq!(classify(5.0, -20.0), ClassificationResult::STRAIGHT);
    }

    #[test]
    fn test_medium_left_from_upward_motion() {
        let result = classify(5.0, -3.0);
        assert_eq!(result.direction, Direction::MediumLeft);
        assert!((result.angle_deg - 59.036243467926475).abs() < 1e-9);
    }

    #[test]
    fn test_large_left_from_downward_motion() {
        // raw = atan2(1, 4) ~ 14.04, folded into (90, 180)
        let result = classify(4.0, 1.0);
        assert_eq!(result.direction, Direction::LargeLeft);
        assert!((result.angle_deg - 104.03624346792648).abs() < 1e-9);
    }

    #[test]
    fn test_right_side_folding() {
        // raw ~ -165.96 -> 90 - (180 - 165.96) = 75.96
        let down_left = classify(-4.0, -1.0);
        assert_eq!(down_left.direction, Direction::LargeRight);
        assert!((down_left.angle_deg - 75.96375653207352).abs() < 1e-9);

        // raw ~ 165.96 -> 90 + (180 - 165.96) = 104.04
        let up_left = classify(-4.0, 1.0);
        assert_eq!(up_left.direction, Direction::LargeRight);
        assert!((up_left.angle_deg - 104.03624346792648).abs() < 1e-9);

        // raw ~ -140.19 -> 50.19
        let steep = classify(-6.0, -5.0);
        assert_eq!(steep.direction, Direction::MediumRight);
        assert!((steep.angle_deg - 50.19442890773481).abs() < 1e-9);
    }

    #[test]
    fn test_pure_horizontal_right_folds_to_ninety() {
        let result = classify(-5.0, 0.0);
        assert_eq!(result.direction, Direction::LargeRight);
        assert_eq!(result.angle_deg, 90.0);
    }

    #[test]
    fn test_below_threshold_is_straight() {
        assert_eq!(classify(0.9, 0.1), ClassificationResult::STRAIGHT);
        assert_eq!(classify(-0.9, 0.1), ClassificationResult::STRAIGHT);
        assert_eq!(classify(1.0, 0.0), ClassificationResult::STRAIGHT);
        assert_eq!(classify(-1.0, 0.0), ClassificationResult::STRAIGHT);
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = DirectionClassifier::new(10.0);
        assert_eq!(
            classifier.classify(MotionVector::new(5.0, -3.0)),
            ClassificationResult::STRAIGHT
        );
        assert_eq!(
            classifier
                .classify(MotionVector::new(50.0, -30.0))
                .direction,
            Direction::MediumLeft
        );
    }

    #[test]
    fn test_nan_motion_is_straight() {
        assert_eq!(classify(f64::NAN, 0.0), ClassificationResult::STRAIGHT);
    }

    #[test]
    fn test_bucket_boundaries_fall_through() {
        assert_eq!(bucket(0.0), None);
        assert_eq!(bucket(30.0), None);
        assert_eq!(bucket(60.0), None);
        assert_eq!(bucket(-5.0), None);
        assert_eq!(bucket(29.999), Some(TurnSize::Small));
        assert_eq!(bucket(30.001), Some(TurnSize::Medium));
        assert_eq!(bucket(170.0), Some(TurnSize::Large));
    }

    #[test]
    fn test_fold_leaves_unhandled_angles_alone() {
        assert_eq!(fold_left(0.0), 0.0);
        assert_eq!(fold_left(-90.0), -90.0);
        assert_eq!(fold_left(135.0), 135.0);
        assert_eq!(fold_right(-90.0), -90.0);
        assert_eq!(fold_right(45.0), 45.0);
    }

    #[test]
    fn test_classify_field_uses_mean() {
        let field = MotionField::from_vectors(
            2,
            1,
            vec![MotionVector::new(8.0, -6.0), MotionVector::new(2.0, 0.0)],
        )
        .unwrap();
        let result = DirectionClassifier::default()
            .classify_field(&field)
            .unwrap();
        assert_eq!(result, classify(5.0, -3.0));
    }

    #[test]
    fn test_classify_field_rejects_empty() {
        let err = DirectionClassifier::default()
            .classify_field(&MotionField::empty())
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
