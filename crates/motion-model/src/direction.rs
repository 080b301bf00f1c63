//! Direction labels and classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Turning direction derived from a frame pair's mean motion.
///
/// `Left` and `Right` are coarse labels: they are only reported when the
/// folded angle lands on a bucket boundary (0, 30 or 60 degrees) or outside
/// every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Straight,
    Left,
    Right,
    SmallLeft,
    MediumLeft,
    LargeLeft,
    SmallRight,
    MediumRight,
    LargeRight,
}

/// Which way a direction turns, ignoring magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// How sharp a turn is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSize {
    Small,
    Medium,
    Large,
}

impl Direction {
    /// Every label, in display order.
    pub const ALL: [Direction; 9] = [
        Direction::Straight,
        Direction::Left,
        Direction::Right,
        Direction::SmallLeft,
        Direction::MediumLeft,
        Direction::LargeLeft,
        Direction::SmallRight,
        Direction::MediumRight,
        Direction::LargeRight,
    ];

    /// Build a fine-grained label, or the coarse one when `size` is `None`.
    pub fn turn(side: Side, size: Option<TurnSize>) -> Self {
        match (side, size) {
            (Side::Left, None) => Direction::Left,
            (Side::Left, Some(TurnSize::Small)) => Direction::SmallLeft,
            (Side::Left, Some(TurnSize::Medium)) => Direction::MediumLeft,
            (Side::Left, Some(TurnSize::Large)) => Direction::LargeLeft,
            (Side::Right, None) => Direction::Right,
            (Side::Right, Some(TurnSize::Small)) => Direction::SmallRight,
            (Side::Right, Some(TurnSize::Medium)) => Direction::MediumRight,
            (Side::Right, Some(TurnSize::Large)) => Direction::LargeRight,
        }
    }

    /// Whether this is a coarse `Left`/`Right` label left over from a boundary gap.
    pub fn is_coarse(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Human-readable overlay text.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Straight => "Straight",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::SmallLeft => "small left",
            Direction::MediumLeft => "medium left",
            Direction::LargeLeft => "large left",
            Direction::SmallRight => "small right",
            Direction::MediumRight => "medium right",
            Direction::LargeRight => "large right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Direction plus folded angle for one frame pair.
///
/// `angle_deg` keeps full precision; rounding is left to whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub direction: Direction,
    pub angle_deg: f64,
}

impl ClassificationResult {
    pub const STRAIGHT: ClassificationResult = ClassificationResult {
        direction: Direction::Straight,
        angle_deg: 0.0,
    };

    pub fn new(direction: Direction, angle_deg: f64) -> Self {
        Self {
            direction,
            angle_deg,
        }
    }

    pub fn is_straight(&self) -> bool {
        self.direction == Direction::Straight
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Angle: {:.2}", self.direction, self.angle_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_overlay_text() {
        assert_eq!(Direction::Straight.to_string(), "Straight");
        assert_eq!(Direction::Left.to_string(), "Left");
        assert_eq!(Direction::MediumLeft.to_string(), "medium left");
        assert_eq!(Direction::LargeRight.to_string(), "large right");
        assert_eq!(format!("{:<6}|", Direction::Left), "Left  |");
    }

    #[test]
    fn test_turn_builds_fine_and_coarse_labels() {
        assert_eq!(Direction::turn(Side::Left, None), Direction::Left);
        assert_eq!(
            Direction::turn(Side::Left, Some(TurnSize::Medium)),
            Direction::MediumLeft
        );
        assert_eq!(Direction::turn(Side::Right, None), Direction::Right);
        assert_eq!(
            Direction::turn(Side::Right, Some(TurnSize::Large)),
            Direction::LargeRight
        );
    }

    #[test]
    fn test_coarse_labels() {
        assert!(Direction::Left.is_coarse());
        assert!(Direction::Right.is_coarse());
        assert!(!Direction::SmallRight.is_coarse());
        assert!(!Direction::Straight.is_coarse());
    }

    #[test]
    fn test_result_display_two_decimals() {
        let result = ClassificationResult::new(Direction::MediumLeft, 59.036243467926475);
        assert_eq!(result.to_string(), "medium left, Angle: 59.04");
        assert_eq!(ClassificationResult::STRAIGHT.to_string(), "Straight, Angle: 0.00");
    }

    #[test]
    fn test_json_format() {
        let result = ClassificationResult::new(Direction::SmallRight, 12.5);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"direction":"small_right","angle_deg":12.5}"#);
    }
}
